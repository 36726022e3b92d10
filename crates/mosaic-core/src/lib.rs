//! mosaic-core: deterministic dashboard composition primitives.
//!
//! Everything in this crate is pure and synchronous: the widget/catalog
//! model, config normalization, the widget factory dispatch table, layout
//! reconciliation, the drag-and-drop reorder controller, and the save
//! supersession ledger. I/O lives in `mosaic-engine` and `mosaic-store`.

pub mod config;
pub mod layout;
pub mod registry;
pub mod reorder;
pub mod sync;
pub mod widget;

/// Stable crate label used by workspace smoke tests.
pub fn crate_label() -> &'static str {
    "mosaic-core"
}

#[cfg(test)]
mod tests {
    use super::crate_label;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "mosaic-core");
    }
}
