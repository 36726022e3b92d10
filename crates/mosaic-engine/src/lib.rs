//! mosaic-engine: dashboard view orchestration over async collaborators.
//!
//! Provides the `CatalogProvider` and `LayoutStore` collaborator traits, the
//! `DashboardView` that reconciles, renders, and reorders one role's
//! dashboard with optimistic persistence, and `MockDashboardService` for
//! unit testing.

pub mod error;
pub mod mock;
pub mod service;
pub mod view;

/// Stable crate label used by workspace smoke tests.
pub fn crate_label() -> &'static str {
    "mosaic-engine"
}

#[cfg(test)]
mod tests {
    use super::crate_label;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "mosaic-engine");
    }
}
