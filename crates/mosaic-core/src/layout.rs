//! Layout model: the persisted per-role widget order and its reconciliation
//! against the authoritative catalog.

use std::collections::BTreeSet;

use crate::widget::{Widget, WidgetId};

/// One role's chosen arrangement. Superseded by overwrite, never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub role: String,
    pub ordered_ids: Vec<WidgetId>,
}

impl Layout {
    /// Absence of a stored layout is equivalent to an empty order, which
    /// reconciles to catalog order.
    #[must_use]
    pub fn empty(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ordered_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn new(role: impl Into<String>, ordered_ids: Vec<WidgetId>) -> Self {
        Self {
            role: role.into(),
            ordered_ids,
        }
    }

    #[must_use]
    pub fn reconciled(&self, catalog: &[Widget]) -> Self {
        Self {
            role: self.role.clone(),
            ordered_ids: reconcile(catalog, &self.ordered_ids),
        }
    }
}

/// Merge a possibly-stale stored order with the current catalog.
///
/// Stale ids are dropped (stable filter, first occurrence wins), then
/// catalog ids missing from the filtered order are appended in catalog
/// order. Deterministic and idempotent: the result contains exactly the
/// catalog ids, once each.
#[must_use]
pub fn reconcile(catalog: &[Widget], stored: &[WidgetId]) -> Vec<WidgetId> {
    let catalog_ids: BTreeSet<&WidgetId> = catalog.iter().map(|widget| &widget.id).collect();

    let mut order = Vec::with_capacity(catalog.len());
    let mut seen = BTreeSet::new();
    for id in stored {
        if catalog_ids.contains(id) && seen.insert(id.clone()) {
            order.push(id.clone());
        }
    }
    for widget in catalog {
        if seen.insert(widget.id.clone()) {
            order.push(widget.id.clone());
        }
    }
    order
}

/// Move `active` to the position `over` occupies, shifting everything else.
///
/// Move semantics, not swap: every other element keeps its relative order,
/// and applying the inverse move restores the original sequence exactly.
/// Returns `None` for a self-drop or when either id is absent.
#[must_use]
pub fn move_widget(
    order: &[WidgetId],
    active: &WidgetId,
    over: &WidgetId,
) -> Option<Vec<WidgetId>> {
    if active == over {
        return None;
    }
    let from = order.iter().position(|id| id == active)?;
    let to = order.iter().position(|id| id == over)?;

    let mut moved = order.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{move_widget, reconcile, Layout};
    use crate::widget::{Widget, WidgetId};

    fn catalog(kinds: &[(&str, &str)]) -> Vec<Widget> {
        kinds
            .iter()
            .map(|(id, kind)| Widget::new(*id, *kind, format!("Widget {id}")))
            .collect()
    }

    fn ids(raw: &[&str]) -> Vec<WidgetId> {
        raw.iter().map(|id| WidgetId::from(*id)).collect()
    }

    #[test]
    fn reconcile_drops_stale_ids_and_appends_new_in_catalog_order() {
        let catalog = catalog(&[("1", "stats"), ("2", "list"), ("3", "mystery")]);
        let reconciled = reconcile(&catalog, &ids(&["2", "9"]));
        assert_eq!(reconciled, ids(&["2", "1", "3"]));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let catalog = catalog(&[("a", "stats"), ("b", "list"), ("c", "chart"), ("d", "note")]);
        for stored in [
            ids(&[]),
            ids(&["d", "a"]),
            ids(&["x", "c", "c", "b", "y"]),
            ids(&["d", "c", "b", "a"]),
        ] {
            let once = reconcile(&catalog, &stored);
            let twice = reconcile(&catalog, &once);
            assert_eq!(once, twice, "stored={stored:?}");
        }
    }

    #[test]
    fn reconcile_yields_exactly_the_catalog_ids_without_duplicates() {
        let catalog = catalog(&[("a", "stats"), ("b", "list"), ("c", "chart")]);
        let reconciled = reconcile(&catalog, &ids(&["b", "b", "z", "a"]));
        assert_eq!(reconciled, ids(&["b", "a", "c"]));
    }

    #[test]
    fn empty_stored_order_reconciles_to_catalog_order() {
        let catalog = catalog(&[("a", "stats"), ("b", "list")]);
        assert_eq!(
            Layout::empty("admin").reconciled(&catalog).ordered_ids,
            ids(&["a", "b"])
        );
    }

    #[test]
    fn empty_catalog_reconciles_to_empty_order() {
        assert!(reconcile(&[], &ids(&["a", "b"])).is_empty());
    }

    #[test]
    fn move_preserves_relative_order_of_others() {
        let order = ids(&["a", "b", "c", "d"]);
        let moved = move_widget(&order, &WidgetId::from("a"), &WidgetId::from("c")).unwrap();
        assert_eq!(moved, ids(&["b", "c", "a", "d"]));
    }

    #[test]
    fn move_is_invertible() {
        let order = ids(&["a", "b", "c", "d"]);
        let forward = move_widget(&order, &WidgetId::from("a"), &WidgetId::from("c")).unwrap();
        let back = move_widget(&forward, &WidgetId::from("a"), &WidgetId::from("b")).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn self_drop_and_unknown_ids_produce_no_move() {
        let order = ids(&["a", "b"]);
        assert!(move_widget(&order, &WidgetId::from("a"), &WidgetId::from("a")).is_none());
        assert!(move_widget(&order, &WidgetId::from("z"), &WidgetId::from("a")).is_none());
        assert!(move_widget(&order, &WidgetId::from("a"), &WidgetId::from("z")).is_none());
    }
}
