//! Drag-and-drop reorder controller.
//!
//! One explicit instance per dashboard view, owned and injected by the
//! view — never module-level state, so multiple dashboards coexist in
//! tests without sharing anything. The controller turns gestures into a
//! candidate order; it never mutates a layout itself.

use crate::layout::move_widget;
use crate::widget::WidgetId;

/// Controller state. Cancellation reaches `Idle` from every phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        active: WidgetId,
    },
}

/// Result of completing a drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The gesture produced a new candidate order.
    Moved { order: Vec<WidgetId> },
    /// Self-drop, missing target, unknown ids, or no drag in progress.
    NoChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReorderController {
    phase: DragPhase,
}

impl ReorderController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The widget being dragged, if any.
    #[must_use]
    pub fn active(&self) -> Option<&WidgetId> {
        match &self.phase {
            DragPhase::Dragging { active } => Some(active),
            DragPhase::Idle => None,
        }
    }

    /// Enter `Dragging` for `id`. Refused (returns false) when a drag is
    /// already in progress or `id` is not part of the current order.
    pub fn begin_drag(&mut self, order: &[WidgetId], id: &WidgetId) -> bool {
        if !matches!(self.phase, DragPhase::Idle) {
            return false;
        }
        if !order.iter().any(|candidate| candidate == id) {
            return false;
        }
        self.phase = DragPhase::Dragging { active: id.clone() };
        true
    }

    /// End the gesture. Always returns the controller to `Idle`; a move is
    /// produced only when a drag was active, a target was supplied, and the
    /// target differs from the dragged widget.
    pub fn complete_drop(&mut self, order: &[WidgetId], over: Option<&WidgetId>) -> DropOutcome {
        let DragPhase::Dragging { active } = std::mem::take(&mut self.phase) else {
            return DropOutcome::NoChange;
        };
        let Some(over) = over else {
            return DropOutcome::NoChange;
        };
        match move_widget(order, &active, over) {
            Some(order) => DropOutcome::Moved { order },
            None => DropOutcome::NoChange,
        }
    }

    /// Abort any gesture in progress. Unconditionally reachable; never
    /// mutates an order.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{DragPhase, DropOutcome, ReorderController};
    use crate::widget::WidgetId;

    fn ids(raw: &[&str]) -> Vec<WidgetId> {
        raw.iter().map(|id| WidgetId::from(*id)).collect()
    }

    #[test]
    fn drag_then_drop_emits_moved_order_and_returns_to_idle() {
        let order = ids(&["a", "b", "c"]);
        let mut controller = ReorderController::new();

        assert!(controller.begin_drag(&order, &WidgetId::from("a")));
        assert_eq!(controller.active(), Some(&WidgetId::from("a")));

        let outcome = controller.complete_drop(&order, Some(&WidgetId::from("c")));
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                order: ids(&["b", "c", "a"])
            }
        );
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn self_drop_leaves_order_unchanged_and_controller_idle() {
        let order = ids(&["a", "b"]);
        let mut controller = ReorderController::new();
        assert!(controller.begin_drag(&order, &WidgetId::from("a")));
        let outcome = controller.complete_drop(&order, Some(&WidgetId::from("a")));
        assert_eq!(outcome, DropOutcome::NoChange);
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn drop_without_target_is_a_cancellation() {
        let order = ids(&["a", "b"]);
        let mut controller = ReorderController::new();
        assert!(controller.begin_drag(&order, &WidgetId::from("b")));
        assert_eq!(controller.complete_drop(&order, None), DropOutcome::NoChange);
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn cancel_is_reachable_mid_drag_and_when_idle() {
        let order = ids(&["a", "b"]);
        let mut controller = ReorderController::new();
        controller.cancel();
        assert_eq!(controller.phase(), &DragPhase::Idle);

        assert!(controller.begin_drag(&order, &WidgetId::from("a")));
        controller.cancel();
        assert_eq!(controller.phase(), &DragPhase::Idle);
        assert_eq!(controller.complete_drop(&order, Some(&WidgetId::from("b"))), DropOutcome::NoChange);
    }

    #[test]
    fn begin_drag_refuses_unknown_widget_and_nested_drag() {
        let order = ids(&["a", "b"]);
        let mut controller = ReorderController::new();
        assert!(!controller.begin_drag(&order, &WidgetId::from("z")));
        assert!(controller.begin_drag(&order, &WidgetId::from("a")));
        assert!(!controller.begin_drag(&order, &WidgetId::from("b")));
        assert_eq!(controller.active(), Some(&WidgetId::from("a")));
    }

    #[test]
    fn two_controllers_do_not_share_state() {
        let order = ids(&["a", "b"]);
        let mut first = ReorderController::new();
        let mut second = ReorderController::new();
        assert!(first.begin_drag(&order, &WidgetId::from("a")));
        assert!(second.begin_drag(&order, &WidgetId::from("b")));
        assert_eq!(first.active(), Some(&WidgetId::from("a")));
        assert_eq!(second.active(), Some(&WidgetId::from("b")));
    }
}
