//! Core geometry types for the desktop
//!
//! Positions and sizes are CSS pixels relative to the page viewport.

mod vec2;
mod rect;
mod size;
mod style;

pub use vec2::Vec2;
pub use rect::Rect;
pub use size::Size;
pub use style::{ChromeStyle, CHROME_STYLE};
