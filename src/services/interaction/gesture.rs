//! Pointer-delta to time-delta mapping for drag gestures.

use std::time::Duration;

use crate::models::event::MIN_DURATION_MINUTES;
use crate::models::settings::CalendarSettings;

/// What a drag does to the event it grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Shift the whole block; armed by a long press on the body
    Move,
    /// Drag the top edge; the bottom edge stays put
    ResizeTop,
    /// Drag the bottom edge; the start stays put
    ResizeBottom,
}

impl DragMode {
    pub fn is_resize(&self) -> bool {
        matches!(self, DragMode::ResizeTop | DragMode::ResizeBottom)
    }
}

/// Start and duration in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub start_time: i32,
    pub duration: i32,
}

impl Timing {
    pub fn new(start_time: i32, duration: i32) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    pub fn end_time(&self) -> i32 {
        self.start_time + self.duration
    }
}

/// Geometry and timing constants the gesture rules run against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub pixels_per_minute: f32,
    pub snap_minutes: i32,
    pub min_duration: i32,
    /// First minute shown on the timeline; starts never go above it
    pub day_start: i32,
    pub long_press: Duration,
    pub click_grace: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from(&CalendarSettings::default())
    }
}

impl From<&CalendarSettings> for GestureConfig {
    fn from(settings: &CalendarSettings) -> Self {
        Self {
            pixels_per_minute: settings.pixels_per_minute,
            snap_minutes: settings.snap_minutes.max(1),
            min_duration: settings.min_duration_minutes.max(MIN_DURATION_MINUTES),
            day_start: 0,
            long_press: settings.long_press(),
            click_grace: settings.click_grace(),
        }
    }
}

/// Convert a pixel delta to minutes and snap it to the grid.
///
/// Halves round toward positive infinity, so -7.5 minutes on a 15 minute
/// grid snaps to 0 and +7.5 snaps to +15.
pub fn snap_delta(pixel_delta: f32, config: &GestureConfig) -> i32 {
    let minutes = f64::from(pixel_delta) / f64::from(config.pixels_per_minute);
    let snap = f64::from(config.snap_minutes);
    let steps = (minutes / snap + 0.5).floor();
    steps as i32 * config.snap_minutes
}

/// Apply an already snapped delta to the timing captured when the drag
/// started.
pub fn apply_gesture(
    mode: DragMode,
    initial: Timing,
    snapped_delta: i32,
    config: &GestureConfig,
) -> Timing {
    let (start_time, duration) = match mode {
        DragMode::Move => (initial.start_time + snapped_delta, initial.duration),
        DragMode::ResizeBottom => (
            initial.start_time,
            (initial.duration + snapped_delta).max(config.min_duration),
        ),
        DragMode::ResizeTop => (
            initial.start_time + snapped_delta,
            (initial.duration - snapped_delta).max(config.min_duration),
        ),
    };

    Timing {
        start_time: start_time.max(config.day_start),
        duration,
    }
}

/// Snap a timeline offset (pixels from the top of the day) to a start
/// minute, for "tap to create".
pub fn minute_at_offset(offset_y: f32, config: &GestureConfig) -> i32 {
    let minute = config.day_start + snap_delta(offset_y, config);
    minute.max(config.day_start)
}
