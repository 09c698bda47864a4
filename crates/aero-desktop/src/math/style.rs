//! Window chrome constants

use super::Size;

/// Chrome constants for the Windows 7 frame
pub struct ChromeStyle {
    pub title_bar_height: f32,
    /// Thickness of the edge resize affordances
    pub edge_handle: f32,
    /// Side length of the corner resize affordances
    pub corner_handle: f32,
    /// How far affordances sit outside the frame
    pub handle_outset: f32,
    /// Smallest size a resize gesture may produce
    pub min_size: Size,
}

/// Default chrome matching the 7.css theme
pub const CHROME_STYLE: ChromeStyle = ChromeStyle {
    title_bar_height: 30.0,
    edge_handle: 6.0,
    corner_handle: 10.0,
    handle_outset: 3.0,
    min_size: Size::new(300.0, 200.0),
};
