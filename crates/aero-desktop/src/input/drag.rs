//! Draggable primitive

use crate::math::{Rect, Vec2};
use crate::window::PointerTarget;

/// An in-progress title bar drag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    /// Offset from the window's top-left corner to the pointer
    pub offset: Vec2,
}

impl DragGesture {
    /// Start a drag if `target` is the bare title bar
    ///
    /// Pointer-downs on nested control buttons never start a drag.
    pub fn begin(target: PointerTarget, frame: &Rect, pointer: Vec2) -> Option<Self> {
        match target {
            PointerTarget::TitleBar => Some(Self {
                offset: pointer - frame.position(),
            }),
            _ => None,
        }
    }

    /// Top-left corner for the current pointer position
    #[inline]
    pub fn position_at(&self, pointer: Vec2) -> Vec2 {
        pointer - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::TitleButton;

    #[test]
    fn test_drag_captures_offset() {
        let frame = Rect::new(100.0, 100.0, 600.0, 400.0);
        let drag = DragGesture::begin(PointerTarget::TitleBar, &frame, Vec2::new(150.0, 112.0)).unwrap();

        assert!((drag.offset.x - 50.0).abs() < 0.001);
        assert!((drag.offset.y - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_drag_ignores_buttons() {
        let frame = Rect::new(100.0, 100.0, 600.0, 400.0);
        let pointer = Vec2::new(680.0, 110.0);

        for button in [TitleButton::Minimize, TitleButton::Maximize, TitleButton::Close] {
            assert!(DragGesture::begin(PointerTarget::TitleButton(button), &frame, pointer).is_none());
        }
        assert!(DragGesture::begin(PointerTarget::Body, &frame, pointer).is_none());
    }

    #[test]
    fn test_drag_moves_with_pointer() {
        let frame = Rect::new(100.0, 100.0, 600.0, 400.0);
        let start = Vec2::new(150.0, 112.0);
        let drag = DragGesture::begin(PointerTarget::TitleBar, &frame, start).unwrap();

        let pos = drag.position_at(start + Vec2::new(50.0, -30.0));
        assert!((pos.x - 150.0).abs() < 0.001);
        assert!((pos.y - 70.0).abs() < 0.001);
    }
}
