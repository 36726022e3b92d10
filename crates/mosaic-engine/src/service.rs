//! Collaborator interfaces consumed by the dashboard view.
//!
//! Implementations can run against the SQLite store (`mosaic-store`) or be
//! mocked for testing. All operations are async; the view itself never
//! blocks on them.

use async_trait::async_trait;

use mosaic_core::widget::{Widget, WidgetId};

use crate::error::DashboardServiceError;

/// Supplies the authoritative widget set for a role. Read-only: the engine
/// never writes back through this interface.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the catalog in its authoritative order.
    async fn fetch_catalog(&self, role: &str) -> Result<Vec<Widget>, DashboardServiceError>;
}

/// Durable per-role layout storage.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Fetch the stored order. `None` is valid and means "no prior
    /// arrangement".
    async fn fetch_layout(&self, role: &str)
        -> Result<Option<Vec<WidgetId>>, DashboardServiceError>;

    /// Overwrite the stored order for the role. Success/failure only, no
    /// payload. Retry policy, if any, belongs to the implementation.
    async fn persist_layout(
        &self,
        role: &str,
        order: &[WidgetId],
    ) -> Result<(), DashboardServiceError>;
}
