//! Page viewport and the layouts derived from it

use crate::math::{Rect, Size, Vec2};

/// Browser viewport
///
/// Windows are laid out in CSS pixels relative to the top-left corner of the
/// page. A viewport at or below the mobile breakpoint switches maximized
/// windows to the full-width layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Viewport size in CSS pixels
    pub size: Size,
    /// Widths at or below this are treated as mobile
    pub mobile_breakpoint: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Size::new(1920.0, 1080.0),
            mobile_breakpoint: 768.0,
        }
    }
}

impl Viewport {
    /// Create a viewport with the default breakpoint
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Default::default()
        }
    }

    /// Replace the size; non-finite or negative values are ignored
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return false;
        }
        self.size = Size::new(width, height);
        true
    }

    #[inline]
    pub fn is_mobile(&self) -> bool {
        self.size.width <= self.mobile_breakpoint
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size.as_vec2() * 0.5
    }

    /// Rect of a window of `size` centered in the viewport
    pub fn centered_rect(&self, size: Size) -> Rect {
        Rect::from_center_size(self.center(), size)
    }

    /// Rect of a maximized window
    ///
    /// Desktop: 90% x 85% at (5%, 7.5%). Mobile: full width, 85% tall at 7.5%.
    pub fn maximized_rect(&self) -> Rect {
        let Size { width, height } = self.size;
        if self.is_mobile() {
            Rect::new(0.0, height * 0.075, width, height * 0.85)
        } else {
            Rect::new(width * 0.05, height * 0.075, width * 0.9, height * 0.85)
        }
    }
}
