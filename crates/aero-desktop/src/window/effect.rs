//! UI effects emitted by the engine
//!
//! The engine never touches the DOM. Every operation returns a list of
//! effects in the order they must be applied; the browser adapter (or a test)
//! interprets them.

use serde::Serialize;
use crate::content::{ContentAction, Sound};
use crate::math::Rect;
use super::{WindowId, WindowKind};

/// Which gesture a set of document listeners belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Drag,
    Resize,
}

/// A single UI side effect
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Effect {
    /// Build the window element (overlay, frame, title bar, body)
    CreateElement {
        window_id: WindowId,
        kind: WindowKind,
        title: String,
        /// Maximize button is clickable
        maximize_enabled: bool,
    },
    /// Show or hide the whole element (`display`)
    SetVisible { window_id: WindowId, visible: bool },
    /// Toggle the `minimized` class
    SetMinimized { window_id: WindowId, minimized: bool },
    /// Toggle the `maximized` class
    SetMaximized { window_id: WindowId, maximized: bool },
    /// Apply left/top/width/height; `centered` keeps the centering transform
    SetGeometry {
        window_id: WindowId,
        rect: Rect,
        centered: bool,
    },
    /// Apply stacking order
    SetZOrder { window_id: WindowId, z_order: u32 },
    /// Create the 8 resize affordances
    InstallResizeHandles { window_id: WindowId },
    /// Remove every resize affordance
    RemoveResizeHandles { window_id: WindowId },
    /// Add document-level pointer-move/pointer-up listeners for a gesture
    AttachDocumentListeners {
        window_id: WindowId,
        gesture: GestureKind,
    },
    /// Remove the document-level listeners of the active gesture
    DetachDocumentListeners { window_id: WindowId },
    /// Title bar cursor: `grabbing` while dragging, `move` otherwise
    SetDragCursor { window_id: WindowId, grabbing: bool },
    /// Forward a content action to the panel inside the window
    Content {
        window_id: WindowId,
        action: ContentAction,
    },
    /// Remove the element and its overlay from the document
    RemoveElement { window_id: WindowId },
    /// Disable pointer events on the page for a short time
    BlockPointerEvents { duration_ms: f64 },
    /// Play a system sound not tied to a window
    PlaySound { sound: Sound },
    /// Navigate the page to `url`
    Reload { url: String },
}

impl Effect {
    /// Window this effect targets, if any
    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            Effect::CreateElement { window_id, .. }
            | Effect::SetVisible { window_id, .. }
            | Effect::SetMinimized { window_id, .. }
            | Effect::SetMaximized { window_id, .. }
            | Effect::SetGeometry { window_id, .. }
            | Effect::SetZOrder { window_id, .. }
            | Effect::InstallResizeHandles { window_id }
            | Effect::RemoveResizeHandles { window_id }
            | Effect::AttachDocumentListeners { window_id, .. }
            | Effect::DetachDocumentListeners { window_id }
            | Effect::SetDragCursor { window_id, .. }
            | Effect::Content { window_id, .. }
            | Effect::RemoveElement { window_id } => Some(*window_id),
            Effect::BlockPointerEvents { .. } | Effect::PlaySound { .. } | Effect::Reload { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serializes_tagged() {
        let effect = Effect::SetGeometry {
            window_id: 7,
            rect: Rect::new(1.0, 2.0, 300.0, 200.0),
            centered: false,
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "setGeometry");
        assert_eq!(json["windowId"], 7);
        assert_eq!(json["rect"]["width"], 300.0);
    }

    #[test]
    fn test_effect_window_id() {
        assert_eq!(Effect::RemoveElement { window_id: 3 }.window_id(), Some(3));
        assert_eq!(Effect::BlockPointerEvents { duration_ms: 100.0 }.window_id(), None);
        assert_eq!(Effect::Reload { url: "/".into() }.window_id(), None);
    }
}
