//! Dashboard view orchestration for one role.
//!
//! `DashboardView` owns the single shared mutable resource — the layout —
//! plus its reorder controller and save ledger. Gestures are synchronous;
//! only the persistence boundary suspends. The intended flow:
//!
//! 1. `load` fetches catalog + stored layout and reconciles them.
//! 2. `render` emits one directive per reconciled widget id.
//! 3. `begin_drag` / `complete_drop` turn gestures into an optimistic new
//!    order and a `PendingSave`.
//! 4. `persist` performs the write (timeout == failure), producing a
//!    `SaveSettlement` that is fed back through `settle`, where stale
//!    settlements are superseded.

use std::time::Duration;

use tracing::{debug, warn};

use mosaic_core::layout::{reconcile, Layout};
use mosaic_core::registry::{RenderDirective, WidgetRegistry};
use mosaic_core::reorder::{DropOutcome, ReorderController};
use mosaic_core::sync::{SaveLedger, SaveResult, SaveTicket, SettleOutcome};
use mosaic_core::widget::{Widget, WidgetId};

use crate::error::DashboardServiceError;
use crate::service::{CatalogProvider, LayoutStore};

/// Behavior knobs for one dashboard view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Revert to the last known-saved order when a save fails. Off by
    /// default: the optimistic order stays visible, favoring perceived
    /// responsiveness. This is a product decision, so it is a knob.
    pub rollback_on_failure: bool,
    /// A persist taking longer than this is settled as a failure.
    pub save_timeout: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rollback_on_failure: false,
            save_timeout: Duration::from_secs(10),
        }
    }
}

/// A confirmed reorder awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub role: String,
    pub order: Vec<WidgetId>,
    pub ticket: SaveTicket,
}

/// Outcome of one persistence attempt, ready to sequence via `settle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSettlement {
    pub ticket: SaveTicket,
    pub order: Vec<WidgetId>,
    pub result: SaveResult,
}

/// Result of completing a drop gesture on the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub moved: bool,
    pub save: Option<PendingSave>,
}

/// User-visible, non-blocking save feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveNotification {
    Saved {
        seq: u64,
    },
    Failed {
        seq: u64,
        reason: String,
        rolled_back: bool,
    },
}

/// One role's assembled dashboard.
#[derive(Debug)]
pub struct DashboardView {
    role: String,
    catalog: Vec<Widget>,
    layout: Layout,
    last_saved: Vec<WidgetId>,
    registry: WidgetRegistry,
    controller: ReorderController,
    ledger: SaveLedger,
    config: ViewConfig,
    notifications: Vec<SaveNotification>,
    completed_reorders: Vec<Vec<WidgetId>>,
}

impl DashboardView {
    /// Fetch catalog and stored layout, then reconcile.
    ///
    /// A failed catalog fetch propagates (nothing can be rendered). A
    /// failed or absent stored layout degrades to catalog order.
    pub async fn load(
        role: &str,
        provider: &dyn CatalogProvider,
        store: &dyn LayoutStore,
        registry: WidgetRegistry,
        config: ViewConfig,
    ) -> Result<Self, DashboardServiceError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(DashboardServiceError::InvalidRole {
                message: "role must be non-empty".to_owned(),
            });
        }

        let catalog = provider.fetch_catalog(role).await?;
        let stored = match store.fetch_layout(role).await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warn!(role, error = %err, "stored layout unavailable; using catalog order");
                Vec::new()
            }
        };

        let ordered = reconcile(&catalog, &stored);
        if ordered != stored {
            debug!(
                role,
                stored = stored.len(),
                reconciled = ordered.len(),
                "stored layout reconciled against catalog"
            );
        }

        Ok(Self {
            role: role.to_owned(),
            last_saved: ordered.clone(),
            layout: Layout::new(role, ordered),
            catalog,
            registry,
            controller: ReorderController::new(),
            ledger: SaveLedger::new(),
            config,
            notifications: Vec::new(),
            completed_reorders: Vec::new(),
        })
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// The reconciled order currently rendered: the only order ever
    /// rendered or persisted.
    #[must_use]
    pub fn order(&self) -> &[WidgetId] {
        &self.layout.ordered_ids
    }

    #[must_use]
    pub fn catalog(&self) -> &[Widget] {
        &self.catalog
    }

    #[must_use]
    pub fn dragging(&self) -> Option<&WidgetId> {
        self.controller.active()
    }

    #[must_use]
    pub fn saves_in_flight(&self) -> usize {
        self.ledger.in_flight()
    }

    /// One directive per reconciled widget id, in order.
    #[must_use]
    pub fn render(&self) -> Vec<RenderDirective> {
        self.layout
            .ordered_ids
            .iter()
            .filter_map(|id| self.catalog.iter().find(|widget| &widget.id == id))
            .map(|widget| self.registry.render(widget))
            .collect()
    }

    /// Re-fetch the catalog and re-reconcile the current order against it.
    /// Any drag in progress is cancelled: its widget may no longer exist.
    pub async fn refresh_catalog(
        &mut self,
        provider: &dyn CatalogProvider,
    ) -> Result<(), DashboardServiceError> {
        let catalog = provider.fetch_catalog(&self.role).await?;
        self.catalog = catalog;
        self.layout.ordered_ids = reconcile(&self.catalog, &self.layout.ordered_ids);
        self.last_saved = reconcile(&self.catalog, &self.last_saved);
        self.controller.cancel();
        Ok(())
    }

    pub fn begin_drag(&mut self, id: &WidgetId) -> bool {
        self.controller.begin_drag(&self.layout.ordered_ids, id)
    }

    pub fn cancel_drag(&mut self) {
        self.controller.cancel();
    }

    /// Complete the active gesture. A real move applies optimistically,
    /// records a reorder-completed event, and hands back a `PendingSave`
    /// tagged with the next sequence number.
    pub fn complete_drop(&mut self, over: Option<&WidgetId>) -> DropResult {
        match self.controller.complete_drop(&self.layout.ordered_ids, over) {
            DropOutcome::NoChange => DropResult {
                moved: false,
                save: None,
            },
            DropOutcome::Moved { order } => {
                self.layout.ordered_ids = order.clone();
                self.completed_reorders.push(order.clone());
                let ticket = self.ledger.issue();
                DropResult {
                    moved: true,
                    save: Some(PendingSave {
                        role: self.role.clone(),
                        order,
                        ticket,
                    }),
                }
            }
        }
    }

    /// Sequence a settlement through the ledger. Stale settlements are
    /// dropped silently; applied ones update the saved baseline or surface
    /// a failure notification (rolling back when configured).
    pub fn settle(&mut self, settlement: SaveSettlement) {
        let seq = settlement.ticket.seq;
        match self.ledger.settle(settlement.ticket, settlement.result) {
            SettleOutcome::Superseded => {
                debug!(role = %self.role, seq, "stale layout save settlement dropped");
            }
            SettleOutcome::Applied(SaveResult::Saved) => {
                self.last_saved = settlement.order;
                self.notifications.push(SaveNotification::Saved { seq });
            }
            SettleOutcome::Applied(SaveResult::Failed { reason }) => {
                let rolled_back = self.config.rollback_on_failure;
                if rolled_back {
                    self.layout.ordered_ids = reconcile(&self.catalog, &self.last_saved);
                }
                warn!(role = %self.role, seq, reason, rolled_back, "layout save failed");
                self.notifications.push(SaveNotification::Failed {
                    seq,
                    reason,
                    rolled_back,
                });
            }
        }
    }

    /// Drain pending save notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<SaveNotification> {
        std::mem::take(&mut self.notifications)
    }

    /// Drain reorder-completed events (one full order per completed drop).
    pub fn take_completed_reorders(&mut self) -> Vec<Vec<WidgetId>> {
        std::mem::take(&mut self.completed_reorders)
    }
}

/// Perform the asynchronous write for a pending save. Never fails: errors
/// and timeouts become a `Failed` settlement for `DashboardView::settle`.
pub async fn persist(
    store: &dyn LayoutStore,
    config: &ViewConfig,
    pending: &PendingSave,
) -> SaveSettlement {
    let write = store.persist_layout(&pending.role, &pending.order);
    let result = match tokio::time::timeout(config.save_timeout, write).await {
        Ok(Ok(())) => SaveResult::Saved,
        Ok(Err(err)) => SaveResult::Failed {
            reason: err.to_string(),
        },
        Err(_) => SaveResult::Failed {
            reason: format!("layout save timed out after {:?}", config.save_timeout),
        },
    };
    SaveSettlement {
        ticket: pending.ticket,
        order: pending.order.clone(),
        result,
    }
}
