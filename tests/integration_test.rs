// Integration tests for the timeline: fetch, layout, drag and write-back
mod fixtures;

use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::Pos2;
use flowstate_calendar::services::event_store::EventStore;
use flowstate_calendar::services::interaction::{DragMode, InteractionEngine};
use flowstate_calendar::services::sync::PersistenceSync;
use pretty_assertions::assert_eq;

use fixtures::{dates, events, still_viewport, RecordingBackend};

const LONG_PRESS: Duration = Duration::from_millis(400);

#[test]
fn test_overlapping_pair_splits_the_column() {
    let store = EventStore::from_events(events::morning());
    let layouts = store.layouts();

    assert_eq!(layouts["a"].width_label(), "50%");
    assert_eq!(layouts["a"].left_label(), "0%");
    assert_eq!(layouts["b"].width_label(), "50%");
    assert_eq!(layouts["b"].left_label(), "50%");
}

#[test]
fn test_fetched_day_feeds_the_store() {
    let mut day = events::morning();
    day.push(events::afternoon_block());
    let sync = PersistenceSync::new(Arc::new(RecordingBackend::serving(day)));

    let result = sync
        .fetch(dates::review_day())
        .recv_timeout(Duration::from_secs(5))
        .unwrap();
    assert_eq!(result.date, dates::review_day());

    let store = EventStore::from_events(result.events.unwrap());
    let layouts = store.layouts();
    assert_eq!(layouts.len(), 3);
    assert_eq!(layouts["c"].width_label(), "100%");
    assert_eq!(layouts["c"].left_label(), "0%");
}

#[test]
fn test_long_press_move_is_synced_on_release() {
    let backend = Arc::new(RecordingBackend::serving(Vec::new()));
    let sync = PersistenceSync::new(backend.clone());
    let mut store = EventStore::from_events(vec![events::standup_block()]);
    let mut engine = InteractionEngine::default();
    let t0 = Instant::now();

    assert!(engine.pointer_down(&store, "a", DragMode::Move, Pos2::new(100.0, 300.0), 200.0, 0.0, t0));
    // Moving before the long press fires does nothing
    assert!(!engine.pointer_move(&mut store, Pos2::new(100.0, 340.0), still_viewport()));
    assert!(engine.poll(0.0, t0 + LONG_PRESS));

    // 54 px at 1.8 px/min is 30 minutes
    assert!(engine.pointer_move(&mut store, Pos2::new(100.0, 354.0), still_viewport()));
    assert_eq!(store.get("a").unwrap().start_time, 570);

    let released = engine.pointer_up(&store, t0 + Duration::from_secs(1)).unwrap();
    sync.push(released).join().unwrap();

    let updates = backend.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, "a");
    assert_eq!(updates[0].start_time, 570);
    assert_eq!(updates[0].duration, 60);
}

#[test]
fn test_resize_bottom_stops_at_minimum() {
    let mut store = EventStore::from_events(vec![events::overlapping_block()]);
    let mut engine = InteractionEngine::default();
    let t0 = Instant::now();

    assert!(engine.pointer_down(&store, "b", DragMode::ResizeBottom, Pos2::new(50.0, 400.0), 100.0, 0.0, t0));
    // Resizing starts at once, no long press
    assert_eq!(engine.dragging_id(), Some("b"));

    engine.pointer_move(&mut store, Pos2::new(50.0, 220.0), still_viewport());
    let event = store.get("b").unwrap();
    assert_eq!(event.start_time, 570);
    assert_eq!(event.duration, 15);
}

#[test]
fn test_sideways_drag_swaps_columns() {
    let mut store = EventStore::from_events(events::morning());
    let mut engine = InteractionEngine::default();
    let t0 = Instant::now();

    engine.pointer_down(&store, "a", DragMode::Move, Pos2::new(100.0, 300.0), 100.0, 0.0, t0);
    engine.poll(0.0, t0 + LONG_PRESS);
    engine.pointer_move(&mut store, Pos2::new(160.0, 300.0), still_viewport());

    let layouts = store.layouts();
    assert_eq!(layouts["a"].left_label(), "50%");
    assert_eq!(layouts["b"].left_label(), "0%");
    // The card now trails the pointer from its new column
    assert_eq!(engine.drag_offset_x("a"), -40.0);
}

#[test]
fn test_click_after_drag_is_suppressed_briefly() {
    let mut store = EventStore::from_events(vec![events::standup_block()]);
    let mut engine = InteractionEngine::default();
    let t0 = Instant::now();

    engine.pointer_down(&store, "a", DragMode::ResizeTop, Pos2::new(100.0, 300.0), 100.0, 0.0, t0);
    engine.pointer_move(&mut store, Pos2::new(100.0, 318.0), still_viewport());
    let released_at = t0 + Duration::from_millis(500);
    assert!(engine.pointer_up(&store, released_at).is_some());

    assert!(engine.should_suppress_click(released_at + Duration::from_millis(50)));
    assert!(!engine.should_suppress_click(released_at + Duration::from_millis(150)));
}

#[test]
fn test_short_press_never_syncs() {
    let store = EventStore::from_events(vec![events::standup_block()]);
    let mut engine = InteractionEngine::default();
    let t0 = Instant::now();

    engine.pointer_down(&store, "a", DragMode::Move, Pos2::new(100.0, 300.0), 100.0, 0.0, t0);
    assert!(!engine.poll(0.0, t0 + Duration::from_millis(200)));
    assert_eq!(engine.pointer_up(&store, t0 + Duration::from_millis(250)), None);
    assert!(!engine.should_suppress_click(t0 + Duration::from_millis(260)));
    assert!(engine.is_idle());
}
