//! Horizontal reordering of overlapping events during a move drag.

use std::collections::HashMap;

use crate::services::event_store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    Left,
    Right,
}

impl ReorderDirection {
    /// Direction of a horizontal displacement; `None` when there is none.
    pub fn from_displacement(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(ReorderDirection::Right)
        } else if dx < 0.0 {
            Some(ReorderDirection::Left)
        } else {
            None
        }
    }

    /// +1 for right, -1 for left.
    pub fn sign(&self) -> f32 {
        match self {
            ReorderDirection::Left => -1.0,
            ReorderDirection::Right => 1.0,
        }
    }
}

/// Swap the dragged event one slot toward `direction` among the events it
/// overlaps.
///
/// The group is ordered by `(sort_index, start_time)`, renumbered `0..n`,
/// and the dragged event trades places with its neighbour. Returns false,
/// leaving the store untouched, when the event is already at that end of
/// the group or is not in the store.
pub fn reorder_step(store: &mut EventStore, dragged_id: &str, direction: ReorderDirection) -> bool {
    let mut group: Vec<(String, (i32, i32))> = store
        .overlapping(dragged_id)
        .into_iter()
        .map(|event| (event.id.clone(), event.cluster_order()))
        .collect();
    group.sort_by_key(|(_, order)| *order);

    let Some(current) = group.iter().position(|(id, _)| id == dragged_id) else {
        return false;
    };

    let target = match direction {
        ReorderDirection::Right if current + 1 < group.len() => current + 1,
        ReorderDirection::Left if current > 0 => current - 1,
        _ => return false,
    };

    let mut updates: HashMap<String, i32> = group
        .iter()
        .enumerate()
        .map(|(index, (id, _))| (id.clone(), index as i32))
        .collect();
    updates.insert(group[current].0.clone(), target as i32);
    updates.insert(group[target].0.clone(), current as i32);

    log::debug!(
        "Reordered '{}' from slot {} to {} among {} overlapping events",
        dragged_id,
        current,
        target,
        group.len()
    );
    store.set_sort_indices(&updates);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::CalendarEvent;
    use crate::services::layout::resolve_layouts;

    fn store() -> EventStore {
        EventStore::from_events(vec![
            CalendarEvent::new("a", "A", "Work", 540, 60),
            CalendarEvent::new("b", "B", "Work", 570, 30),
            CalendarEvent::new("c", "C", "Work", 840, 30),
        ])
    }

    fn sort_index(store: &EventStore, id: &str) -> Option<i32> {
        store.get(id).and_then(|event| event.sort_index)
    }

    #[test]
    fn test_move_right_swaps_with_neighbour() {
        let mut store = store();
        assert!(reorder_step(&mut store, "a", ReorderDirection::Right));
        assert_eq!(sort_index(&store, "a"), Some(1));
        assert_eq!(sort_index(&store, "b"), Some(0));
        assert_eq!(sort_index(&store, "c"), None);

        let layouts = resolve_layouts(store.as_slice());
        assert_eq!(layouts["b"].column, 0);
        assert_eq!(layouts["a"].column, 1);
    }

    #[test]
    fn test_bounded_at_edges() {
        let mut store = store();
        assert!(!reorder_step(&mut store, "a", ReorderDirection::Left));
        assert!(!reorder_step(&mut store, "b", ReorderDirection::Right));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_lone_event_never_moves() {
        let mut store = store();
        assert!(!reorder_step(&mut store, "c", ReorderDirection::Right));
        assert!(!reorder_step(&mut store, "c", ReorderDirection::Left));
    }

    #[test]
    fn test_repeated_steps_walk_across_group() {
        let mut store = EventStore::from_events(vec![
            CalendarEvent::new("a", "A", "Work", 600, 60),
            CalendarEvent::new("b", "B", "Work", 600, 60),
            CalendarEvent::new("c", "C", "Work", 600, 60),
        ]);

        assert!(reorder_step(&mut store, "a", ReorderDirection::Right));
        assert!(reorder_step(&mut store, "a", ReorderDirection::Right));
        assert!(!reorder_step(&mut store, "a", ReorderDirection::Right));

        assert_eq!(sort_index(&store, "b"), Some(0));
        assert_eq!(sort_index(&store, "c"), Some(1));
        assert_eq!(sort_index(&store, "a"), Some(2));
    }

    #[test]
    fn test_unknown_event() {
        let mut store = store();
        assert!(!reorder_step(&mut store, "zzz", ReorderDirection::Left));
    }

    #[test]
    fn test_direction_from_displacement() {
        assert_eq!(ReorderDirection::from_displacement(3.0), Some(ReorderDirection::Right));
        assert_eq!(ReorderDirection::from_displacement(-0.5), Some(ReorderDirection::Left));
        assert_eq!(ReorderDirection::from_displacement(0.0), None);
    }
}
