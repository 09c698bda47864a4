//! Window configuration for creation

use crate::math::{Rect, Size};
use super::WindowKind;

/// Configuration for opening a window
#[derive(Clone, Debug)]
pub struct WindowConfig {
    /// Window kind
    pub kind: WindowKind,
    /// Title bar text
    pub title: String,
    /// Explicit geometry (None = centered in the viewport)
    pub geometry: Option<Rect>,
    /// Size used when centering
    pub size: Size,
    /// Resize floor (None = chrome default)
    pub min_size: Option<Size>,
}

impl WindowConfig {
    /// Defaults for a kind: its title and size, centered
    pub fn for_kind(kind: WindowKind) -> Self {
        Self {
            kind,
            title: kind.default_title().to_string(),
            geometry: None,
            size: kind.default_size(),
            min_size: None,
        }
    }

    /// Place the window at an explicit rectangle
    pub fn at(mut self, geometry: Rect) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Override the title
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
