//! Pointer targets and resize affordances

use serde::{Deserialize, Serialize};
use crate::math::{Rect, CHROME_STYLE};

/// Title bar control button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleButton {
    Minimize,
    Maximize,
    Close,
}

impl TitleButton {
    /// Match a button by its `aria-label`
    pub fn from_aria_label(label: &str) -> Option<Self> {
        match label {
            "Minimize" => Some(TitleButton::Minimize),
            "Maximize" => Some(TitleButton::Maximize),
            "Close" => Some(TitleButton::Close),
            _ => None,
        }
    }
}

/// Edge or corner a resize affordance sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    N,
    E,
    S,
    W,
    NE,
    SE,
    SW,
    NW,
}

impl ResizeDirection {
    /// All eight directions, in the order the affordances are installed
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::N,
        ResizeDirection::E,
        ResizeDirection::S,
        ResizeDirection::W,
        ResizeDirection::NE,
        ResizeDirection::SE,
        ResizeDirection::SW,
        ResizeDirection::NW,
    ];

    /// Parse the short form used in affordance class names (`resize-ne`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "n" => Some(ResizeDirection::N),
            "e" => Some(ResizeDirection::E),
            "s" => Some(ResizeDirection::S),
            "w" => Some(ResizeDirection::W),
            "ne" => Some(ResizeDirection::NE),
            "se" => Some(ResizeDirection::SE),
            "sw" => Some(ResizeDirection::SW),
            "nw" => Some(ResizeDirection::NW),
            _ => None,
        }
    }

    /// Short form
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeDirection::N => "n",
            ResizeDirection::E => "e",
            ResizeDirection::S => "s",
            ResizeDirection::W => "w",
            ResizeDirection::NE => "ne",
            ResizeDirection::SE => "se",
            ResizeDirection::SW => "sw",
            ResizeDirection::NW => "nw",
        }
    }

    /// Moves the left edge
    #[inline]
    pub fn moves_left(self) -> bool {
        matches!(self, ResizeDirection::W | ResizeDirection::NW | ResizeDirection::SW)
    }

    /// Moves the right edge
    #[inline]
    pub fn moves_right(self) -> bool {
        matches!(self, ResizeDirection::E | ResizeDirection::NE | ResizeDirection::SE)
    }

    /// Moves the top edge
    #[inline]
    pub fn moves_top(self) -> bool {
        matches!(self, ResizeDirection::N | ResizeDirection::NE | ResizeDirection::NW)
    }

    /// Moves the bottom edge
    #[inline]
    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeDirection::S | ResizeDirection::SE | ResizeDirection::SW)
    }

    /// Is a corner affordance
    #[inline]
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeDirection::NE | ResizeDirection::SE | ResizeDirection::SW | ResizeDirection::NW
        )
    }

    /// CSS cursor for this affordance
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeDirection::N => "n-resize",
            ResizeDirection::E => "e-resize",
            ResizeDirection::S => "s-resize",
            ResizeDirection::W => "w-resize",
            ResizeDirection::NE => "ne-resize",
            ResizeDirection::SE => "se-resize",
            ResizeDirection::SW => "sw-resize",
            ResizeDirection::NW => "nw-resize",
        }
    }

    /// Affordance rectangle relative to the window's own top-left corner
    pub fn affordance_rect(self, frame: &Rect) -> Rect {
        let edge = CHROME_STYLE.edge_handle;
        let corner = CHROME_STYLE.corner_handle;
        let out = CHROME_STYLE.handle_outset;
        let (w, h) = (frame.width, frame.height);

        match self {
            ResizeDirection::N => Rect::new(0.0, -out, w, edge),
            ResizeDirection::S => Rect::new(0.0, h - edge + out, w, edge),
            ResizeDirection::E => Rect::new(w - edge + out, 0.0, edge, h),
            ResizeDirection::W => Rect::new(-out, 0.0, edge, h),
            ResizeDirection::NE => Rect::new(w - corner + out, -out, corner, corner),
            ResizeDirection::SE => Rect::new(w - corner + out, h - corner + out, corner, corner),
            ResizeDirection::SW => Rect::new(-out, h - corner + out, corner, corner),
            ResizeDirection::NW => Rect::new(-out, -out, corner, corner),
        }
    }
}

/// What a pointer-down landed on inside a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PointerTarget {
    /// Title bar surface (drag handle)
    TitleBar,
    /// A control button nested in the title bar
    TitleButton(TitleButton),
    /// A resize affordance
    ResizeHandle(ResizeDirection),
    /// Window body content
    Body,
}
