//! Drag-and-drop reorder planning.
//!
//! # Responsibility
//! - Translate "drop item X at visible index N" into position writes.
//!
//! # Invariants
//! - Only the span between the old and new index is rewritten.
//! - The span reuses its own position slots in ascending order, so rows
//!   outside the span keep their relative order even when positions have gaps.
//! - On contiguous lists the dragged item lands at `new_index + offset`,
//!   where `offset` is the first item's position.

use crate::model::todo_item::{ItemId, TodoItem};
use crate::repo::item_repo::PositionChange;

/// Planned outcome of one in-list drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    /// Index of the dragged item in the unfiltered ordering before the drop.
    pub old_index: usize,
    /// Index of the dragged item in the unfiltered ordering after the drop.
    pub new_index: usize,
    /// Moved item first, then the shifted span in ordering.
    pub changes: Vec<PositionChange>,
}

impl ReorderPlan {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Plans a drag of `item_id` to `target_index` of the visible ordering.
///
/// `items` must be one list's items ordered by position. When `display_done`
/// is false the visible ordering skips done items, and `target_index` is
/// resolved against it. Indexes past the end clamp to the last visible item.
///
/// Returns `None` when `item_id` is not part of `items`.
pub fn plan_reorder(
    items: &[TodoItem],
    item_id: ItemId,
    target_index: usize,
    display_done: bool,
) -> Option<ReorderPlan> {
    let old_index = items.iter().position(|item| item.id == item_id)?;
    let new_index = resolve_new_index(items, target_index, display_done).unwrap_or(old_index);

    if old_index == new_index {
        return Some(ReorderPlan {
            old_index,
            new_index,
            changes: Vec::new(),
        });
    }

    let (low, high) = (old_index.min(new_index), old_index.max(new_index));
    let span = &items[low..=high];
    let slots = span.iter().map(|item| item.position);

    let reordered: Vec<ItemId> = if old_index < new_index {
        // Moving down: the span shifts up by one, X takes the last slot.
        span[1..]
            .iter()
            .map(|item| item.id)
            .chain(std::iter::once(item_id))
            .collect()
    } else {
        // Moving up: X takes the first slot, the span shifts down by one.
        std::iter::once(item_id)
            .chain(span[..span.len() - 1].iter().map(|item| item.id))
            .collect()
    };

    let mut changes: Vec<PositionChange> = reordered
        .into_iter()
        .zip(slots)
        .map(|(id, position)| PositionChange { id, position })
        .collect();

    // Moved item leads the batch.
    if let Some(moved_at) = changes.iter().position(|change| change.id == item_id) {
        let moved = changes.remove(moved_at);
        changes.insert(0, moved);
    }

    Some(ReorderPlan {
        old_index,
        new_index,
        changes,
    })
}

fn resolve_new_index(items: &[TodoItem], target_index: usize, display_done: bool) -> Option<usize> {
    if display_done {
        let last = items.len().checked_sub(1)?;
        return Some(target_index.min(last));
    }

    let visible: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.done)
        .map(|(index, _)| index)
        .collect();
    visible
        .get(target_index)
        .or_else(|| visible.last())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::plan_reorder;
    use crate::model::todo_item::{ItemId, TodoItem};
    use crate::repo::item_repo::PositionChange;
    use uuid::Uuid;

    fn apply_changes(items: &mut [TodoItem], changes: &[PositionChange]) {
        for change in changes {
            if let Some(item) = items.iter_mut().find(|item| item.id == change.id) {
                item.position = change.position;
            }
        }
        items.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
    }

    fn list_with_positions(positions: &[i64]) -> Vec<TodoItem> {
        let list_id = Uuid::new_v4();
        positions
            .iter()
            .enumerate()
            .map(|(index, position)| TodoItem::new(list_id, format!("item {index}"), *position))
            .collect()
    }

    fn ids(items: &[TodoItem]) -> Vec<ItemId> {
        items.iter().map(|item| item.id).collect()
    }

    fn reorder(items: &[TodoItem], from: usize, to: usize, display_done: bool) -> Vec<ItemId> {
        let plan = plan_reorder(items, items[from].id, to, display_done).unwrap();
        let mut reordered = items.to_vec();
        apply_changes(&mut reordered, &plan.changes);
        ids(&reordered)
    }

    #[test]
    fn same_index_is_noop() {
        let items = list_with_positions(&[0, 1, 2]);
        let plan = plan_reorder(&items, items[1].id, 1, true).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn unknown_item_returns_none() {
        let items = list_with_positions(&[0, 1]);
        assert!(plan_reorder(&items, Uuid::new_v4(), 0, true).is_none());
    }

    #[test]
    fn moving_down_matches_offset_arithmetic() {
        let items = list_with_positions(&[-2, -1, 0, 1, 2]);
        let plan = plan_reorder(&items, items[1].id, 3, true).unwrap();

        let offset = items[0].position;
        assert_eq!(plan.changes[0].id, items[1].id);
        assert_eq!(plan.changes[0].position, 3 + offset);
        assert_eq!(plan.changes.len(), 3);
        assert_eq!(plan.changes[1].id, items[2].id);
        assert_eq!(plan.changes[1].position, offset + 1);
        assert_eq!(plan.changes[2].id, items[3].id);
        assert_eq!(plan.changes[2].position, offset + 2);
    }

    #[test]
    fn moving_up_matches_offset_arithmetic() {
        let items = list_with_positions(&[4, 5, 6, 7]);
        let plan = plan_reorder(&items, items[3].id, 0, true).unwrap();

        assert_eq!(plan.changes[0].id, items[3].id);
        assert_eq!(plan.changes[0].position, 4);
        let shifted: Vec<i64> = plan.changes[1..].iter().map(|c| c.position).collect();
        assert_eq!(shifted, vec![5, 6, 7]);
    }

    #[test]
    fn every_drag_keeps_span_order_and_lands_at_target() {
        let items = list_with_positions(&[-3, -2, -1, 0, 1, 2]);
        for from in 0..items.len() {
            for to in 0..items.len() {
                let result = reorder(&items, from, to, true);
                assert_eq!(result[to], items[from].id, "drag {from} -> {to}");

                let mut expected = ids(&items);
                let moved = expected.remove(from);
                expected.insert(to, moved);
                assert_eq!(result, expected, "drag {from} -> {to}");
            }
        }
    }

    #[test]
    fn gaps_outside_span_keep_order() {
        let items = list_with_positions(&[0, 5, 6, 7]);
        let result = reorder(&items, 3, 2, true);
        assert_eq!(result, vec![items[0].id, items[1].id, items[3].id, items[2].id]);
    }

    #[test]
    fn hidden_done_items_resolve_target_against_visible_rows() {
        let mut items = list_with_positions(&[0, 1, 2, 3]);
        items[1].done = true;
        // Visible: [0, 2, 3]. Dropping item 3 at visible index 1 lands before item 2.
        let plan = plan_reorder(&items, items[3].id, 1, false).unwrap();
        assert_eq!(plan.old_index, 3);
        assert_eq!(plan.new_index, 2);

        let mut reordered = items.clone();
        apply_changes(&mut reordered, &plan.changes);
        assert_eq!(
            ids(&reordered),
            vec![items[0].id, items[1].id, items[3].id, items[2].id]
        );
    }

    #[test]
    fn target_past_end_clamps_to_last_visible() {
        let mut items = list_with_positions(&[0, 1, 2, 3]);
        items[3].done = true;
        let plan = plan_reorder(&items, items[0].id, 99, false).unwrap();
        assert_eq!(plan.new_index, 2);

        let plan_all = plan_reorder(&items, items[0].id, 99, true).unwrap();
        assert_eq!(plan_all.new_index, 3);
    }
}
