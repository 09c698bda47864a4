//! Window instance, kind and lifecycle state

use serde::{Deserialize, Serialize};
use crate::content::PanelContent;
use crate::math::{Rect, Size, Vec2, CHROME_STYLE};
use super::WindowId;

/// Window lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    #[default]
    Normal,
    /// Hidden for a short flash, then reverts on its own
    Minimized,
    Maximized,
    /// Teardown in progress
    Closing,
    Closed,
}

impl WindowState {
    /// Any state that has not started closing
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, WindowState::Normal | WindowState::Minimized | WindowState::Maximized)
    }

    /// States in which the element is laid out with real geometry
    #[inline]
    pub fn has_geometry(self) -> bool {
        matches!(self, WindowState::Normal | WindowState::Maximized)
    }
}

/// Window kind - decides resizability and singleton behavior
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowKind {
    /// Live radio player
    Radio,
    /// Live dance video stream
    Video,
    /// News feed reader
    Rss,
    /// Contact form
    ContactForm,
    /// Generic message dialog
    Dialog,
    /// The maintenance window itself
    Primary,
}

impl WindowKind {
    /// Fixed-size panels cannot be resized, minimized or maximized
    #[inline]
    pub fn is_resizable(self) -> bool {
        matches!(self, WindowKind::Dialog | WindowKind::Primary)
    }

    /// Kinds limited to one live instance
    #[inline]
    pub fn is_singleton(self) -> bool {
        !matches!(self, WindowKind::Dialog)
    }

    /// Kinds that open maximized on narrow viewports
    #[inline]
    pub fn maximizes_on_mobile(self) -> bool {
        matches!(
            self,
            WindowKind::Radio | WindowKind::Video | WindowKind::Rss | WindowKind::ContactForm
        )
    }

    /// Pressing minimize on a minimized window restores it
    #[inline]
    pub fn minimize_toggles(self) -> bool {
        matches!(self, WindowKind::Primary)
    }

    /// CSS class of the window element
    pub fn css_class(self) -> &'static str {
        match self {
            WindowKind::Radio => "radio-player-window",
            WindowKind::Video => "edm-player-window",
            WindowKind::Rss => "rss-feed-window",
            WindowKind::ContactForm => "email-form-window",
            WindowKind::Dialog => "dialog",
            WindowKind::Primary => "maintenance-window",
        }
    }

    /// Default title bar text
    pub fn default_title(self) -> &'static str {
        match self {
            WindowKind::Radio => "Antena 3 - Rádio",
            WindowKind::Video => "Dance Television",
            WindowKind::Rss => "Notícias ao Minuto",
            WindowKind::ContactForm => "Contacto",
            WindowKind::Dialog => "Aviso",
            WindowKind::Primary => "Manutenção do Sistema",
        }
    }

    /// Size a window of this kind opens at
    pub fn default_size(self) -> Size {
        match self {
            WindowKind::Radio => Size::new(420.0, 520.0),
            WindowKind::Video => Size::new(900.0, 720.0),
            WindowKind::Rss => Size::new(800.0, 700.0),
            WindowKind::ContactForm => Size::new(520.0, 640.0),
            WindowKind::Dialog => Size::new(400.0, 200.0),
            WindowKind::Primary => Size::new(600.0, 420.0),
        }
    }
}

/// Geometry saved on entering Maximized
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RestoreSnapshot {
    pub rect: Rect,
    pub centered: bool,
}

/// A floating panel on the simulated desktop
#[derive(Debug)]
pub struct WindowInstance {
    /// Unique identifier
    pub id: WindowId,
    /// Window kind
    pub kind: WindowKind,
    /// Title bar text
    pub title: String,
    /// Current lifecycle state
    pub state: WindowState,
    /// Geometry in viewport pixels
    pub geometry: Rect,
    /// Still carries the initial `translate(-50%, -50%)` centering
    pub centered: bool,
    /// Stacking order (higher = on top)
    pub z_order: u32,
    /// Resize floor
    pub min_size: Size,
    pub(crate) restore: Option<RestoreSnapshot>,
    pub(crate) prev_state: Option<WindowState>,
    pub(crate) handles_installed: bool,
    /// Maximized by the narrow-viewport rule and kept that way
    pub(crate) pinned_maximized: bool,
    pub(crate) content: Option<Box<dyn PanelContent>>,
}

impl WindowInstance {
    /// Create a window in the Normal state
    pub fn new(id: WindowId, kind: WindowKind, title: impl Into<String>, geometry: Rect) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            state: WindowState::Normal,
            geometry,
            centered: true,
            z_order: 0,
            min_size: CHROME_STYLE.min_size,
            restore: None,
            prev_state: None,
            handles_installed: false,
            pinned_maximized: false,
            content: None,
        }
    }

    /// Attach the panel content
    pub fn with_content(mut self, content: Box<dyn PanelContent>) -> Self {
        self.content = Some(content);
        self
    }

    /// Whether this window accepts resize gestures
    #[inline]
    pub fn resizable(&self) -> bool {
        self.kind.is_resizable()
    }

    /// Whether the window is open
    #[inline]
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Whether the 8 resize affordances currently exist
    #[inline]
    pub fn handles_installed(&self) -> bool {
        self.handles_installed
    }

    /// Geometry captured at the moment of maximizing
    pub fn restore_rect(&self) -> Option<Rect> {
        self.restore.map(|s| s.rect)
    }

    /// Top-left corner
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.geometry.position()
    }

    /// Title bar rectangle
    pub fn title_bar_rect(&self) -> Rect {
        Rect::new(
            self.geometry.x,
            self.geometry.y,
            self.geometry.width,
            CHROME_STYLE.title_bar_height,
        )
    }

    /// DOM id of the window body that content attaches to
    pub fn body_element_id(&self) -> String {
        format!("aero-window-{}-body", self.id)
    }

    /// Panel content, if any
    pub fn content(&self) -> Option<&dyn PanelContent> {
        self.content.as_deref()
    }

    /// Mutable panel content, if any
    pub fn content_mut(&mut self) -> Option<&mut (dyn PanelContent + 'static)> {
        self.content.as_deref_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_window(kind: WindowKind) -> WindowInstance {
        WindowInstance::new(1, kind, "Test", Rect::new(100.0, 100.0, 600.0, 400.0))
    }

    #[test]
    fn test_resizable_kinds() {
        assert!(WindowKind::Dialog.is_resizable());
        assert!(WindowKind::Primary.is_resizable());
        assert!(!WindowKind::Radio.is_resizable());
        assert!(!WindowKind::Video.is_resizable());
        assert!(!WindowKind::Rss.is_resizable());
        assert!(!WindowKind::ContactForm.is_resizable());
    }

    #[test]
    fn test_singleton_kinds() {
        assert!(WindowKind::Radio.is_singleton());
        assert!(WindowKind::Video.is_singleton());
        assert!(!WindowKind::Dialog.is_singleton());
    }

    #[test]
    fn test_new_window_defaults() {
        let w = create_test_window(WindowKind::Dialog);
        assert_eq!(w.state, WindowState::Normal);
        assert!(w.centered);
        assert!(!w.handles_installed());
        assert!(w.restore_rect().is_none());
        assert_eq!(w.min_size, CHROME_STYLE.min_size);
    }

    #[test]
    fn test_title_bar_rect() {
        let w = create_test_window(WindowKind::Dialog);
        let r = w.title_bar_rect();
        assert!((r.width - 600.0).abs() < 0.001);
        assert!((r.height - CHROME_STYLE.title_bar_height).abs() < 0.001);
    }

    #[test]
    fn test_live_states() {
        assert!(WindowState::Normal.is_live());
        assert!(WindowState::Minimized.is_live());
        assert!(!WindowState::Closing.is_live());
        assert!(!WindowState::Closed.is_live());
        assert!(!WindowState::Minimized.has_geometry());
    }

    #[test]
    fn test_body_element_id() {
        let w = create_test_window(WindowKind::Rss);
        assert_eq!(w.body_element_id(), "aero-window-1-body");
    }
}
