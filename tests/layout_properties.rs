// Property-based tests for the column resolver and the gesture rules

use flowstate_calendar::models::event::CalendarEvent;
use flowstate_calendar::services::event_store::EventStore;
use flowstate_calendar::services::interaction::{
    apply_gesture, reorder_step, DragMode, GestureConfig, ReorderDirection, Timing,
};
use flowstate_calendar::services::layout::resolve_layouts;
use proptest::prelude::*;

fn arb_events(max: usize) -> impl Strategy<Value = Vec<CalendarEvent>> {
    prop::collection::vec((0i32..1380, 15i32..240, prop::option::of(0i32..4)), 1..max).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (start, duration, sort_index))| {
                    let mut event = CalendarEvent::new(format!("e{}", i), "Block", "Work", start, duration);
                    event.sort_index = sort_index;
                    event
                })
                .collect()
        },
    )
}

fn arb_mode() -> impl Strategy<Value = DragMode> {
    prop_oneof![
        Just(DragMode::Move),
        Just(DragMode::ResizeTop),
        Just(DragMode::ResizeBottom),
    ]
}

proptest! {
    #[test]
    fn every_event_gets_a_valid_column(events in arb_events(12)) {
        let layouts = resolve_layouts(&events);
        prop_assert_eq!(layouts.len(), events.len());
        for layout in layouts.values() {
            prop_assert!(layout.columns >= 1);
            prop_assert!(layout.column < layout.columns);
            prop_assert!(layout.left_percent() + layout.width_percent() <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn overlapping_events_never_share_a_column(events in arb_events(12)) {
        let layouts = resolve_layouts(&events);
        for a in &events {
            for b in &events {
                if a.id != b.id && a.overlaps(b) {
                    let (la, lb) = (layouts[&a.id], layouts[&b.id]);
                    prop_assert_ne!(la.column, lb.column);
                    // Same cluster, same width
                    prop_assert_eq!(la.columns, lb.columns);
                }
            }
        }
    }

    #[test]
    fn disjoint_events_take_full_width(starts in prop::collection::btree_set(0i32..48, 1..10)) {
        // 30 minute blocks on a 30 minute grid never overlap
        let events: Vec<CalendarEvent> = starts
            .iter()
            .map(|slot| CalendarEvent::new(format!("s{}", slot), "Block", "Work", slot * 30, 30))
            .collect();
        for layout in resolve_layouts(&events).values() {
            prop_assert_eq!(layout.width_label(), "100%");
            prop_assert_eq!(layout.left_label(), "0%");
        }
    }

    #[test]
    fn gestures_respect_floor_and_day_start(
        mode in arb_mode(),
        start in 0i32..1440,
        duration in 15i32..600,
        delta in -2000i32..2000,
    ) {
        let config = GestureConfig::default();
        let timing = apply_gesture(mode, Timing::new(start, duration), delta, &config);
        prop_assert!(timing.start_time >= 0);
        prop_assert!(timing.duration >= config.min_duration);
        if mode == DragMode::Move {
            prop_assert_eq!(timing.duration, duration);
        }
        if mode == DragMode::ResizeBottom {
            prop_assert_eq!(timing.start_time, start);
        }
    }

    #[test]
    fn reorder_there_and_back_restores_columns(events in arb_events(8)) {
        let mut store = EventStore::from_events(events);
        let id = store.as_slice()[0].id.clone();

        if reorder_step(&mut store, &id, ReorderDirection::Right) {
            let after_right = store.layouts()[&id];
            prop_assert!(reorder_step(&mut store, &id, ReorderDirection::Left));
            prop_assert!(reorder_step(&mut store, &id, ReorderDirection::Right));
            prop_assert_eq!(store.layouts()[&id], after_right);
        }
    }
}
