//! Edge auto-scroll while a drag is active.
//!
//! When the pointer sits inside the edge band of the scroll viewport the
//! coupler produces a per-frame scroll speed. The caller drives frames
//! (egui repaints) and stops them when [`AutoScroller::is_active`] turns
//! false.

use crate::models::settings::AutoScrollSettings;

#[derive(Debug, Clone, PartialEq)]
pub struct AutoScroller {
    threshold: f32,
    min_speed: f32,
    max_speed: f32,
    /// Signed pixels per frame; zero means stopped
    speed: f32,
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self::new(&AutoScrollSettings::default())
    }
}

impl AutoScroller {
    pub fn new(settings: &AutoScrollSettings) -> Self {
        Self {
            threshold: settings.edge_threshold,
            min_speed: settings.min_speed,
            max_speed: settings.max_speed,
            speed: 0.0,
        }
    }

    /// Speed for a pointer `overshoot` pixels past the dead-zone edge.
    fn speed_for(&self, overshoot: f32) -> f32 {
        let ratio = (overshoot / self.threshold).min(1.0);
        self.min_speed + (self.max_speed - self.min_speed) * ratio
    }

    /// Update the speed from the pointer position and the viewport's top and
    /// bottom edges (same coordinate space as `pointer_y`).
    pub fn track(&mut self, pointer_y: f32, viewport_top: f32, viewport_bottom: f32) {
        let bottom_edge = viewport_bottom - self.threshold;
        let top_edge = viewport_top + self.threshold;

        self.speed = if pointer_y > bottom_edge {
            self.speed_for(pointer_y - bottom_edge)
        } else if pointer_y < top_edge {
            -self.speed_for(top_edge - pointer_y)
        } else {
            0.0
        };
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_active(&self) -> bool {
        self.speed != 0.0
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    /// Scroll offset after one frame, clamped to the scrollable range.
    pub fn next_offset(&self, scroll_offset: f32, max_scroll_offset: f32) -> f32 {
        (scroll_offset + self.speed).clamp(0.0, max_scroll_offset.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP: f32 = 100.0;
    const BOTTOM: f32 = 700.0;

    #[test]
    fn test_dead_zone_is_idle() {
        let mut scroller = AutoScroller::default();
        scroller.track(400.0, TOP, BOTTOM);
        assert!(!scroller.is_active());
        scroller.track(BOTTOM - 60.0, TOP, BOTTOM);
        assert!(!scroller.is_active());
    }

    #[test]
    fn test_speed_scales_with_overshoot() {
        let mut scroller = AutoScroller::default();

        scroller.track(BOTTOM - 30.0, TOP, BOTTOM);
        assert!((scroller.speed() - 9.5).abs() < 1e-4);

        scroller.track(BOTTOM, TOP, BOTTOM);
        assert!((scroller.speed() - 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_speed_saturates_past_edge() {
        let mut scroller = AutoScroller::default();
        scroller.track(BOTTOM + 500.0, TOP, BOTTOM);
        assert_eq!(scroller.speed(), 17.0);
    }

    #[test]
    fn test_top_edge_scrolls_up() {
        let mut scroller = AutoScroller::default();
        scroller.track(TOP + 45.0, TOP, BOTTOM);
        assert!((scroller.speed() + 5.75).abs() < 1e-4);
    }

    #[test]
    fn test_reentering_dead_zone_stops() {
        let mut scroller = AutoScroller::default();
        scroller.track(BOTTOM, TOP, BOTTOM);
        assert!(scroller.is_active());
        scroller.track(300.0, TOP, BOTTOM);
        assert!(!scroller.is_active());
    }

    #[test]
    fn test_next_offset_clamps() {
        let mut scroller = AutoScroller::default();
        scroller.track(BOTTOM, TOP, BOTTOM);
        assert_eq!(scroller.next_offset(100.0, 2000.0), 117.0);
        assert_eq!(scroller.next_offset(1995.0, 2000.0), 2000.0);

        scroller.track(TOP, TOP, BOTTOM);
        assert_eq!(scroller.next_offset(5.0, 2000.0), 0.0);
    }
}
