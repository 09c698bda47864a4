//! Pointer gesture handling
//!
//! Provides the drag and resize primitives, the gesture router, and the
//! model of the shared document-level listener set.

mod router;
mod drag;
mod resize;
mod listeners;

pub use router::{ActiveGesture, Gesture, GestureRouter};
pub use drag::DragGesture;
pub use resize::{calculate_resize, ResizeGesture};
pub use listeners::{DocumentListeners, ListenerId, PointerEventKind};
