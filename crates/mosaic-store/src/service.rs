//! Async collaborator adapter over the synchronous SQLite repositories.
//!
//! Implements the engine's `CatalogProvider` and `LayoutStore` traits so a
//! `DashboardView` can run directly against the local database. Storage
//! errors are normalized into `DashboardServiceError` categories; sqlite
//! details never cross the trait boundary.

use async_trait::async_trait;

use mosaic_core::widget::{Widget, WidgetId};
use mosaic_engine::error::DashboardServiceError;
use mosaic_engine::service::{CatalogProvider, LayoutStore};

use crate::layout_repository::LayoutRepository;
use crate::widget_repository::WidgetRepository;
use crate::{Config, Db, DbError};

pub struct SqliteDashboardService {
    db: Db,
}

impl SqliteDashboardService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn open(cfg: Config) -> Result<Self, DbError> {
        Ok(Self::new(Db::open(cfg)?))
    }

    #[must_use]
    pub fn db(&self) -> &Db {
        &self.db
    }
}

#[async_trait]
impl CatalogProvider for SqliteDashboardService {
    async fn fetch_catalog(&self, role: &str) -> Result<Vec<Widget>, DashboardServiceError> {
        WidgetRepository::new(&self.db).list_for_role(role).map_err(|err| {
            DashboardServiceError::CatalogUnavailable {
                role: role.to_owned(),
                message: err.to_string(),
            }
        })
    }
}

#[async_trait]
impl LayoutStore for SqliteDashboardService {
    async fn fetch_layout(
        &self,
        role: &str,
    ) -> Result<Option<Vec<WidgetId>>, DashboardServiceError> {
        LayoutRepository::new(&self.db)
            .get(role)
            .map_err(|err| DashboardServiceError::StoreUnavailable {
                message: err.to_string(),
            })
    }

    async fn persist_layout(
        &self,
        role: &str,
        order: &[WidgetId],
    ) -> Result<(), DashboardServiceError> {
        LayoutRepository::new(&self.db)
            .save(role, order)
            .map_err(|err| DashboardServiceError::StoreUnavailable {
                message: err.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::SqliteDashboardService;
    use crate::widget_repository::{WidgetRecord, WidgetRepository};
    use crate::Db;
    use mosaic_core::registry::WidgetRegistry;
    use mosaic_core::widget::WidgetId;
    use mosaic_engine::service::{CatalogProvider, LayoutStore};
    use mosaic_engine::view::{persist, DashboardView, ViewConfig};
    use serde_json::json;

    fn seeded_service() -> SqliteDashboardService {
        let db = Db::open_in_memory().unwrap();
        {
            let widgets = WidgetRepository::new(&db);
            let mut revenue = WidgetRecord::new("admin", "stats", "Revenue")
                .with_structured_config(json!({"value": "1200", "unit": "USD"}))
                .at_position(1);
            revenue.id = "revenue".to_owned();
            let mut recent = WidgetRecord::new("admin", "list", "Recent").at_position(2);
            recent.id = "recent".to_owned();
            let mut notes = WidgetRecord::new("admin", "note", "Notes").at_position(3);
            notes.id = "notes".to_owned();
            widgets.create(&mut revenue).unwrap();
            widgets.create(&mut recent).unwrap();
            widgets.create(&mut notes).unwrap();
        }
        SqliteDashboardService::new(db)
    }

    #[tokio::test]
    async fn fetch_catalog_returns_widgets_in_position_order() {
        let service = seeded_service();
        let catalog = service.fetch_catalog("admin").await.unwrap();
        let kinds: Vec<&str> = catalog.iter().map(|w| w.kind.as_str()).collect();
        assert_eq!(kinds, vec!["stats", "list", "note"]);
        assert_eq!(service.fetch_layout("admin").await.unwrap(), None);
    }

    #[tokio::test]
    async fn dashboard_view_round_trips_a_reorder_through_sqlite() {
        let service = seeded_service();
        let config = ViewConfig::default();

        let mut view = DashboardView::load(
            "admin",
            &service,
            &service,
            WidgetRegistry::builtin(),
            config.clone(),
        )
        .await
        .unwrap();

        assert!(view.begin_drag(&WidgetId::from("revenue")));
        let pending = view
            .complete_drop(Some(&WidgetId::from("notes")))
            .save
            .unwrap();
        let settlement = persist(&service, &config, &pending).await;
        view.settle(settlement);

        // A fresh view sees the persisted arrangement.
        let reloaded = DashboardView::load(
            "admin",
            &service,
            &service,
            WidgetRegistry::builtin(),
            config,
        )
        .await
        .unwrap();
        let order: Vec<&str> = reloaded.order().iter().map(WidgetId::as_str).collect();
        assert_eq!(order, vec!["recent", "notes", "revenue"]);
    }

    #[tokio::test]
    async fn stored_layout_survives_catalog_changes() {
        let service = seeded_service();
        service
            .persist_layout(
                "admin",
                &[
                    WidgetId::from("notes"),
                    WidgetId::from("ghost"),
                    WidgetId::from("revenue"),
                ],
            )
            .await
            .unwrap();

        let view = DashboardView::load(
            "admin",
            &service,
            &service,
            WidgetRegistry::builtin(),
            ViewConfig::default(),
        )
        .await
        .unwrap();
        // Ghost dropped, remaining stored order kept, new widget appended.
        let order: Vec<&str> = view.order().iter().map(WidgetId::as_str).collect();
        assert_eq!(order, vec!["notes", "revenue", "recent"]);
    }
}
