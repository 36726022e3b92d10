//! Normalized error types for dashboard collaborator operations.
//!
//! Transport-agnostic: implementations hide their sqlite/http details behind
//! these categories. Catalog-unavailable is the only condition that prevents
//! rendering a view; everything else is handled locally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardServiceError {
    /// The widget catalog cannot be fetched; the view renders nothing.
    #[error("widget catalog unavailable for role {role:?}: {message}")]
    CatalogUnavailable { role: String, message: String },

    /// The layout store is unreachable or rejected the operation.
    #[error("layout store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The role key was empty or malformed.
    #[error("invalid role: {message}")]
    InvalidRole { message: String },

    /// Unexpected internal failure in a collaborator.
    #[error("internal dashboard service error: {message}")]
    Internal { message: String },
}

#[cfg(test)]
mod tests {
    use super::DashboardServiceError;

    #[test]
    fn display_carries_role_and_message() {
        let err = DashboardServiceError::CatalogUnavailable {
            role: "admin".to_owned(),
            message: "connection refused".to_owned(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("admin"), "{rendered}");
        assert!(rendered.contains("connection refused"), "{rendered}");
    }
}
