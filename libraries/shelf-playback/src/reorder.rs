//! Queue reorder controller
//!
//! Translates a drag-and-drop result (dragged track, track it was dropped
//! on) into a single `ReorderQueue` action. Holds no state of its own.

use crate::action::Action;
use shelf_core::{Track, TrackId};
use tracing::warn;

/// Move the item at `from` to `to`, shifting everything in between
///
/// Relative order of all other items is preserved.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// Build the reorder action for a drop of `source` onto `destination`
///
/// Returns `None` for a drop outside the list, a drop onto itself, or ids
/// not present in `queue`.
pub fn reorder_action(queue: &[Track], source: TrackId, destination: Option<TrackId>) -> Option<Action> {
    let destination = destination?;
    if source == destination {
        return None;
    }

    let Some(from) = queue.iter().position(|t| t.id == source) else {
        warn!(%source, "Dragged track not found in queue");
        return None;
    };
    let Some(to) = queue.iter().position(|t| t.id == destination) else {
        warn!(%destination, "Drop target not found in queue");
        return None;
    };

    Some(Action::ReorderQueue(move_item(queue, from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(ids: &[i64]) -> Vec<Track> {
        ids.iter()
            .map(|&id| Track::new(TrackId::new(id), format!("T{}", id), "A", format!("u{}", id)))
            .collect()
    }

    fn order(action: Option<Action>) -> Vec<i64> {
        match action {
            Some(Action::ReorderQueue(tracks)) => tracks.iter().map(|t| t.id.as_i64()).collect(),
            other => panic!("expected reorder, got {:?}", other),
        }
    }

    #[test]
    fn move_item_forward_and_back() {
        assert_eq!(move_item(&[1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(move_item(&[1, 2, 3, 4], 3, 1), vec![1, 4, 2, 3]);
        assert_eq!(move_item(&[1, 2, 3], 1, 1), vec![1, 2, 3]);
    }

    #[test]
    fn drag_down() {
        let q = queue(&[1, 2, 3, 4]);
        let action = reorder_action(&q, TrackId::new(1), Some(TrackId::new(3)));
        assert_eq!(order(action), vec![2, 3, 1, 4]);
    }

    #[test]
    fn drag_up() {
        let q = queue(&[1, 2, 3, 4]);
        let action = reorder_action(&q, TrackId::new(4), Some(TrackId::new(1)));
        assert_eq!(order(action), vec![4, 1, 2, 3]);
    }

    #[test]
    fn drop_outside_or_onto_self_is_ignored() {
        let q = queue(&[1, 2, 3]);
        assert!(reorder_action(&q, TrackId::new(2), None).is_none());
        assert!(reorder_action(&q, TrackId::new(2), Some(TrackId::new(2))).is_none());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let q = queue(&[1, 2, 3]);
        assert!(reorder_action(&q, TrackId::new(9), Some(TrackId::new(1))).is_none());
        assert!(reorder_action(&q, TrackId::new(1), Some(TrackId::new(9))).is_none());
    }
}
