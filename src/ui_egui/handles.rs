// Event card hit zones
//
// A card is split into three pointer targets:
// - Top strip: resize the start
// - Bottom strip: resize the end
// - Everything else: long-press to move

use egui::{Pos2, Rect, Vec2};

use crate::services::interaction::DragMode;

/// Height of a resize strip on a tall card
pub const HANDLE_HEIGHT: f32 = 16.0;
/// Width of the grip bar drawn inside a strip
pub const GRIP_WIDTH: f32 = 32.0;

/// Resize strips of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRects {
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    /// Strips span the full card width. On short cards each strip shrinks
    /// to a third of the height so the body stays grabbable.
    pub fn for_card(card: Rect) -> Self {
        let zone_height = HANDLE_HEIGHT.min(card.height() / 3.0);
        Self {
            top: Rect::from_min_size(card.min, Vec2::new(card.width(), zone_height)),
            bottom: Rect::from_min_size(
                Pos2::new(card.left(), card.bottom() - zone_height),
                Vec2::new(card.width(), zone_height),
            ),
        }
    }

    /// Gesture a press at `pos` starts. `None` when outside the card.
    pub fn hit_test(&self, card: Rect, pos: Pos2) -> Option<DragMode> {
        if !card.contains(pos) {
            None
        } else if self.top.contains(pos) {
            Some(DragMode::ResizeTop)
        } else if self.bottom.contains(pos) {
            Some(DragMode::ResizeBottom)
        } else {
            Some(DragMode::Move)
        }
    }

    pub fn get(&self, mode: DragMode) -> Option<Rect> {
        match mode {
            DragMode::ResizeTop => Some(self.top),
            DragMode::ResizeBottom => Some(self.bottom),
            DragMode::Move => None,
        }
    }
}

/// Draw the grip bars, highlighting the hovered strip.
pub fn draw_handles(
    painter: &egui::Painter,
    handles: &HandleRects,
    hovered: Option<DragMode>,
    color: egui::Color32,
) {
    for (mode, rect, grip_y) in [
        (DragMode::ResizeTop, handles.top, handles.top.top() + 4.0),
        (DragMode::ResizeBottom, handles.bottom, handles.bottom.bottom() - 4.0),
    ] {
        if hovered == Some(mode) {
            painter.rect_filled(rect, 2.0, color.gamma_multiply(0.15));
        }
        let grip = Rect::from_center_size(
            Pos2::new(rect.center().x, grip_y),
            Vec2::new(GRIP_WIDTH.min(rect.width()), 3.0),
        );
        painter.rect_filled(grip, 1.5, color.gamma_multiply(0.35));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(height: f32) -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 200.0), Vec2::new(120.0, height))
    }

    #[test]
    fn test_tall_card_zones() {
        let rect = card(108.0);
        let handles = HandleRects::for_card(rect);

        assert_eq!(handles.hit_test(rect, Pos2::new(150.0, 205.0)), Some(DragMode::ResizeTop));
        assert_eq!(handles.hit_test(rect, Pos2::new(150.0, 300.0)), Some(DragMode::ResizeBottom));
        assert_eq!(handles.hit_test(rect, Pos2::new(150.0, 250.0)), Some(DragMode::Move));
        assert_eq!(handles.hit_test(rect, Pos2::new(90.0, 250.0)), None);
    }

    #[test]
    fn test_short_card_keeps_a_body() {
        // 15 minutes at 1.8 px/min
        let rect = card(27.0);
        let handles = HandleRects::for_card(rect);

        assert_eq!(handles.top.height(), 9.0);
        assert_eq!(handles.hit_test(rect, Pos2::new(150.0, 213.5)), Some(DragMode::Move));
    }

    #[test]
    fn test_get() {
        let handles = HandleRects::for_card(card(60.0));
        assert_eq!(handles.get(DragMode::ResizeTop), Some(handles.top));
        assert_eq!(handles.get(DragMode::Move), None);
    }
}
