// Event drag interaction
//
// Turns pointer input on the day timeline into event mutations:
// - Long press on a card body: move the block (and reorder it sideways)
// - Press on a top/bottom handle: resize immediately
// - Pointer near the viewport edge: auto-scroll, which keeps moving the block

mod gesture;
mod reorder;

use std::time::Instant;

use egui::Pos2;

pub use gesture::{apply_gesture, minute_at_offset, snap_delta, DragMode, GestureConfig, Timing};
pub use reorder::{reorder_step, ReorderDirection};

use crate::models::event::CalendarEvent;
use crate::models::settings::Settings;
use crate::services::autoscroll::AutoScroller;
use crate::services::event_store::EventStore;

/// Scroll container geometry, in the same screen space as pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
    pub scroll_offset: f32,
    pub max_scroll_offset: f32,
}

/// Where and when a gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOrigin {
    pub pointer: Pos2,
    pub scroll_offset: f32,
    /// Rendered width of the grabbed card
    pub element_width: f32,
}

/// An active drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub event_id: String,
    pub mode: DragMode,
    pub origin: DragOrigin,
    /// Timing of the event when the gesture began
    pub initial: Timing,
    /// Horizontal offset of the card from its column, for rendering
    pub drag_x: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pointer is down on a card body; becomes a move drag at `fires_at`
    PendingLongPress {
        event_id: String,
        origin: DragOrigin,
        initial: Timing,
        fires_at: Instant,
    },
    Dragging(DragSession),
}

/// Recompute the dragged event's timing from the pointer and scroll
/// positions and write it to the store.
///
/// Scroll movement counts like pointer movement, so a stationary pointer
/// over an auto-scrolling viewport still drags the event.
pub fn apply_drag(
    session: &DragSession,
    pointer_y: f32,
    scroll_offset: f32,
    store: &mut EventStore,
    config: &GestureConfig,
) -> bool {
    let pixel_delta =
        (pointer_y - session.origin.pointer.y) + (scroll_offset - session.origin.scroll_offset);
    let snapped = snap_delta(pixel_delta, config);
    let timing = apply_gesture(session.mode, session.initial, snapped, config);
    store.set_timing(&session.event_id, timing.start_time, timing.duration)
}

/// Pointer interaction state machine for one timeline.
///
/// Time is passed in explicitly so the long-press deadline and the click
/// grace window can be driven by the UI clock or by tests.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    config: GestureConfig,
    state: InteractionState,
    autoscroll: AutoScroller,
    last_pointer_y: f32,
    /// Set once a drag actually starts; cleared on the next pointer-down
    drag_occurred: bool,
    /// End of the click-suppression window after a drag was released
    click_guard_until: Option<Instant>,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default(), AutoScroller::default())
    }
}

impl InteractionEngine {
    pub fn new(config: GestureConfig, autoscroll: AutoScroller) -> Self {
        Self {
            config,
            state: InteractionState::Idle,
            autoscroll,
            last_pointer_y: 0.0,
            drag_occurred: false,
            click_guard_until: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            GestureConfig::from(&settings.calendar),
            AutoScroller::new(&settings.auto_scroll),
        )
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            InteractionState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Id of the event being dragged, if any.
    pub fn dragging_id(&self) -> Option<&str> {
        self.session().map(|session| session.event_id.as_str())
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.session().map(|session| session.mode)
    }

    /// Horizontal render offset for an event; zero unless it is being moved.
    pub fn drag_offset_x(&self, event_id: &str) -> f32 {
        match self.session() {
            Some(session) if session.event_id == event_id => session.drag_x,
            _ => 0.0,
        }
    }

    /// When the pending long press will fire, for scheduling a repaint.
    pub fn pending_deadline(&self) -> Option<Instant> {
        match &self.state {
            InteractionState::PendingLongPress { fires_at, .. } => Some(*fires_at),
            _ => None,
        }
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.session().is_some() && self.autoscroll.is_active()
    }

    /// Pointer pressed on an event. Body presses arm the long press; handle
    /// presses start resizing at once. Ignored unless idle.
    pub fn pointer_down(
        &mut self,
        store: &EventStore,
        event_id: &str,
        mode: DragMode,
        pointer: Pos2,
        element_width: f32,
        scroll_offset: f32,
        now: Instant,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }

        self.drag_occurred = false;
        self.click_guard_until = None;

        let Some(event) = store.get(event_id) else {
            log::warn!("Pointer down on unknown event '{}'", event_id);
            return false;
        };

        let initial = Timing::new(event.start_time, event.duration);
        let origin = DragOrigin {
            pointer,
            scroll_offset,
            element_width,
        };

        if mode == DragMode::Move {
            self.state = InteractionState::PendingLongPress {
                event_id: event_id.to_string(),
                origin,
                initial,
                fires_at: now + self.config.long_press,
            };
        } else {
            self.start_drag(event_id.to_string(), mode, origin, initial);
        }
        true
    }

    /// Fire the long-press timer if it is due. The drag's scroll origin is
    /// taken at fire time; the pointer origin is where the press began.
    pub fn poll(&mut self, scroll_offset: f32, now: Instant) -> bool {
        let InteractionState::PendingLongPress { fires_at, .. } = &self.state else {
            return false;
        };
        if now < *fires_at {
            return false;
        }

        let InteractionState::PendingLongPress {
            event_id,
            mut origin,
            initial,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return false;
        };
        origin.scroll_offset = scroll_offset;
        self.start_drag(event_id, DragMode::Move, origin, initial);
        true
    }

    fn start_drag(&mut self, event_id: String, mode: DragMode, origin: DragOrigin, initial: Timing) {
        log::debug!("Drag started on '{}' ({:?})", event_id, mode);
        self.drag_occurred = true;
        self.last_pointer_y = origin.pointer.y;
        self.autoscroll.stop();
        self.state = InteractionState::Dragging(DragSession {
            event_id,
            mode,
            origin,
            initial,
            drag_x: 0.0,
        });
    }

    /// Pointer moved. While a long press is pending this is ignored; while
    /// dragging it reorders (move only), updates timing and re-evaluates
    /// auto-scroll. Returns true if the drag is live.
    pub fn pointer_move(&mut self, store: &mut EventStore, pointer: Pos2, viewport: Viewport) -> bool {
        let InteractionState::Dragging(session) = &mut self.state else {
            return false;
        };

        if session.mode == DragMode::Move {
            session.drag_x = pointer.x - session.origin.pointer.x;
            let width = session.origin.element_width;

            if width > 0.0 && session.drag_x.abs() > width / 2.0 {
                if let Some(direction) = ReorderDirection::from_displacement(session.drag_x) {
                    if reorder_step(store, &session.event_id, direction) {
                        session.origin.pointer.x += direction.sign() * width;
                        session.drag_x -= direction.sign() * width;
                    }
                }
            }
        }

        self.last_pointer_y = pointer.y;
        apply_drag(session, pointer.y, viewport.scroll_offset, store, &self.config);
        self.autoscroll.track(pointer.y, viewport.top, viewport.bottom);
        true
    }

    /// One auto-scroll frame. Returns the scroll offset the container should
    /// move to, or `None` when the loop should stop.
    pub fn frame(&mut self, store: &mut EventStore, viewport: Viewport) -> Option<f32> {
        let InteractionState::Dragging(session) = &self.state else {
            self.autoscroll.stop();
            return None;
        };
        if !self.autoscroll.is_active() {
            return None;
        }

        let offset = self
            .autoscroll
            .next_offset(viewport.scroll_offset, viewport.max_scroll_offset);
        apply_drag(session, self.last_pointer_y, offset, store, &self.config);
        Some(offset)
    }

    /// Pointer released. Cancels the long press and auto-scroll, and
    /// returns the mutated event when a drag took place so it can be synced.
    pub fn pointer_up(&mut self, store: &EventStore, now: Instant) -> Option<CalendarEvent> {
        let previous = std::mem::take(&mut self.state);
        self.autoscroll.stop();

        if self.drag_occurred {
            self.click_guard_until = Some(now + self.config.click_grace);
        }

        match previous {
            InteractionState::Dragging(session) if self.drag_occurred => {
                log::debug!("Drag released on '{}'", session.event_id);
                store.get(&session.event_id).cloned()
            }
            _ => None,
        }
    }

    /// True while a drag is live or within the grace window after one, so a
    /// trailing click does not open the editor.
    pub fn should_suppress_click(&self, now: Instant) -> bool {
        if !self.drag_occurred {
            return false;
        }
        match self.click_guard_until {
            Some(until) => now < until,
            None => true,
        }
    }

    /// Pointer pressed on empty timeline. Forgets the last drag so the
    /// coming click is not suppressed.
    pub fn background_pressed(&mut self) {
        if self.is_idle() {
            self.drag_occurred = false;
            self.click_guard_until = None;
        }
    }

    /// Drop any gesture without syncing, e.g. when the view goes away.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
        self.autoscroll.stop();
        self.drag_occurred = false;
        self.click_guard_until = None;
    }
}
