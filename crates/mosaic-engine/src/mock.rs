//! Mock dashboard service for unit testing.
//!
//! Implements both collaborator traits over in-memory maps, records every
//! call, and lets tests inject per-method errors and an artificial persist
//! delay for timeout scenarios.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use mosaic_core::widget::{Widget, WidgetId};

use crate::error::DashboardServiceError;
use crate::service::{CatalogProvider, LayoutStore};

/// A recorded call to the mock service.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FetchCatalog(String),
    FetchLayout(String),
    PersistLayout {
        role: String,
        order: Vec<WidgetId>,
    },
}

/// Mock implementation of `CatalogProvider` + `LayoutStore`.
#[derive(Default)]
pub struct MockDashboardService {
    catalogs: Mutex<HashMap<String, Vec<Widget>>>,
    layouts: Mutex<HashMap<String, Vec<WidgetId>>>,
    calls: Mutex<Vec<MockCall>>,
    catalog_error: Mutex<Option<DashboardServiceError>>,
    fetch_layout_error: Mutex<Option<DashboardServiceError>>,
    persist_error: Mutex<Option<DashboardServiceError>>,
    persist_delay: Mutex<Option<Duration>>,
}

impl MockDashboardService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the catalog for a role.
    #[must_use]
    pub fn with_catalog(self, role: &str, widgets: Vec<Widget>) -> Self {
        lock_or_recover(&self.catalogs).insert(role.to_owned(), widgets);
        self
    }

    /// Pre-populate a stored layout for a role.
    #[must_use]
    pub fn with_layout(self, role: &str, order: Vec<WidgetId>) -> Self {
        lock_or_recover(&self.layouts).insert(role.to_owned(), order);
        self
    }

    /// Configure `fetch_catalog` to fail.
    #[must_use]
    pub fn with_catalog_error(self, err: DashboardServiceError) -> Self {
        *lock_or_recover(&self.catalog_error) = Some(err);
        self
    }

    /// Configure `fetch_layout` to fail.
    #[must_use]
    pub fn with_fetch_layout_error(self, err: DashboardServiceError) -> Self {
        *lock_or_recover(&self.fetch_layout_error) = Some(err);
        self
    }

    /// Configure `persist_layout` to fail.
    #[must_use]
    pub fn with_persist_error(self, err: DashboardServiceError) -> Self {
        *lock_or_recover(&self.persist_error) = Some(err);
        self
    }

    /// Delay every persist before it completes (for timeout tests).
    #[must_use]
    pub fn with_persist_delay(self, delay: Duration) -> Self {
        *lock_or_recover(&self.persist_delay) = Some(delay);
        self
    }

    /// All calls recorded so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock_or_recover(&self.calls).clone()
    }

    /// The layout currently stored for a role.
    #[must_use]
    pub fn persisted(&self, role: &str) -> Option<Vec<WidgetId>> {
        lock_or_recover(&self.layouts).get(role).cloned()
    }

    fn record(&self, call: MockCall) {
        lock_or_recover(&self.calls).push(call);
    }
}

#[async_trait]
impl CatalogProvider for MockDashboardService {
    async fn fetch_catalog(&self, role: &str) -> Result<Vec<Widget>, DashboardServiceError> {
        self.record(MockCall::FetchCatalog(role.to_owned()));
        if let Some(err) = lock_or_recover(&self.catalog_error).clone() {
            return Err(err);
        }
        Ok(lock_or_recover(&self.catalogs)
            .get(role)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl LayoutStore for MockDashboardService {
    async fn fetch_layout(
        &self,
        role: &str,
    ) -> Result<Option<Vec<WidgetId>>, DashboardServiceError> {
        self.record(MockCall::FetchLayout(role.to_owned()));
        if let Some(err) = lock_or_recover(&self.fetch_layout_error).clone() {
            return Err(err);
        }
        Ok(lock_or_recover(&self.layouts).get(role).cloned())
    }

    async fn persist_layout(
        &self,
        role: &str,
        order: &[WidgetId],
    ) -> Result<(), DashboardServiceError> {
        self.record(MockCall::PersistLayout {
            role: role.to_owned(),
            order: order.to_vec(),
        });
        let delay = *lock_or_recover(&self.persist_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = lock_or_recover(&self.persist_error).clone() {
            return Err(err);
        }
        lock_or_recover(&self.layouts).insert(role.to_owned(), order.to_vec());
        Ok(())
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
