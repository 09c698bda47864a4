//! Resizable primitive

use crate::math::{Rect, Size, Vec2};
use crate::window::ResizeDirection;

/// Compute the rectangle produced by dragging a resize affordance
///
/// Edges the direction does not move stay where they were, including when a
/// minimum clamps the size: a clamped west drag keeps the right edge fixed.
pub fn calculate_resize(direction: ResizeDirection, start: Rect, delta: Vec2, min_size: Size) -> Rect {
    let mut rect = start;

    if direction.moves_right() {
        rect.width = (start.width + delta.x).max(min_size.width);
    }
    if direction.moves_left() {
        rect.width = (start.width - delta.x).max(min_size.width);
        rect.x = start.right() - rect.width;
    }
    if direction.moves_bottom() {
        rect.height = (start.height + delta.y).max(min_size.height);
    }
    if direction.moves_top() {
        rect.height = (start.height - delta.y).max(min_size.height);
        rect.y = start.bottom() - rect.height;
    }

    rect
}

/// An in-progress resize from one affordance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeGesture {
    /// Affordance being dragged
    pub direction: ResizeDirection,
    /// Pointer position at pointer-down
    pub start_pointer: Vec2,
    /// Window geometry at pointer-down
    pub start_rect: Rect,
    /// Size floor
    pub min_size: Size,
}

impl ResizeGesture {
    /// Record the starting pointer and geometry
    pub fn begin(direction: ResizeDirection, start_rect: Rect, start_pointer: Vec2, min_size: Size) -> Self {
        Self {
            direction,
            start_pointer,
            start_rect,
            min_size,
        }
    }

    /// Geometry for the current pointer position
    pub fn apply(&self, pointer: Vec2) -> Rect {
        calculate_resize(self.direction, self.start_rect, pointer - self.start_pointer, self.min_size)
    }
}
