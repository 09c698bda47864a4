//! Gesture router state machine

use crate::math::{Rect, Vec2};
use crate::window::{GestureKind, WindowId};
use super::{DragGesture, ListenerId, ResizeGesture};

/// Gesture in progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Moving a window by its title bar
    Drag(DragGesture),
    /// Resizing a window from an affordance
    Resize(ResizeGesture),
}

impl Gesture {
    /// Listener kind for this gesture
    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::Drag(_) => GestureKind::Drag,
            Gesture::Resize(_) => GestureKind::Resize,
        }
    }

    /// New geometry for a pointer position
    pub fn apply(&self, current: &Rect, pointer: Vec2) -> Rect {
        match self {
            Gesture::Drag(drag) => current.with_position(drag.position_at(pointer)),
            Gesture::Resize(resize) => resize.apply(pointer),
        }
    }
}

/// The single active gesture, with the listeners it registered
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveGesture {
    pub window_id: WindowId,
    pub gesture: Gesture,
    pub listeners: [ListenerId; 2],
}

/// Gesture router managing the active pointer session
///
/// There is one pointer, so at most one gesture exists at a time.
#[derive(Debug, Default)]
pub struct GestureRouter {
    active: Option<ActiveGesture>,
}

impl GestureRouter {
    /// Create a new router
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Current gesture
    #[inline]
    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    /// Check if a gesture is in progress
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Check if `window_id` owns the active gesture
    #[inline]
    pub fn is_active_for(&self, window_id: WindowId) -> bool {
        self.active.is_some_and(|a| a.window_id == window_id)
    }

    /// Start a gesture, replacing any previous one
    ///
    /// Returns the replaced gesture so its listeners can be released.
    pub fn start(
        &mut self,
        window_id: WindowId,
        gesture: Gesture,
        listeners: [ListenerId; 2],
    ) -> Option<ActiveGesture> {
        self.active.replace(ActiveGesture {
            window_id,
            gesture,
            listeners,
        })
    }

    /// End the current gesture
    pub fn end(&mut self) -> Option<ActiveGesture> {
        self.active.take()
    }

    /// End the gesture only if `window_id` owns it
    pub fn cancel_for(&mut self, window_id: WindowId) -> Option<ActiveGesture> {
        if self.is_active_for(window_id) {
            self.active.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Size, CHROME_STYLE};
    use crate::window::ResizeDirection;

    fn drag() -> Gesture {
        Gesture::Drag(DragGesture { offset: Vec2::new(10.0, 10.0) })
    }

    #[test]
    fn test_router_start_and_end() {
        let mut router = GestureRouter::new();
        assert!(!router.is_active());

        assert!(router.start(1, drag(), [1, 2]).is_none());
        assert!(router.is_active_for(1));
        assert!(!router.is_active_for(2));

        let ended = router.end().unwrap();
        assert_eq!(ended.listeners, [1, 2]);
        assert!(!router.is_active());
    }

    #[test]
    fn test_start_replaces_previous() {
        let mut router = GestureRouter::new();
        router.start(1, drag(), [1, 2]);
        let replaced = router.start(2, drag(), [3, 4]).unwrap();
        assert_eq!(replaced.window_id, 1);
        assert!(router.is_active_for(2));
    }

    #[test]
    fn test_cancel_for_other_window_is_noop() {
        let mut router = GestureRouter::new();
        router.start(1, drag(), [1, 2]);
        assert!(router.cancel_for(2).is_none());
        assert!(router.cancel_for(1).is_some());
    }

    #[test]
    fn test_gesture_apply() {
        let current = Rect::new(0.0, 0.0, 400.0, 300.0);
        let moved = drag().apply(&current, Vec2::new(110.0, 60.0));
        assert_eq!(moved, Rect::new(100.0, 50.0, 400.0, 300.0));

        let resize = Gesture::Resize(ResizeGesture::begin(
            ResizeDirection::E,
            current,
            Vec2::new(400.0, 10.0),
            CHROME_STYLE.min_size,
        ));
        let r = resize.apply(&current, Vec2::new(450.0, 10.0));
        assert_eq!(r.size(), Size::new(450.0, 300.0));
        assert_eq!(resize.kind(), GestureKind::Resize);
    }
}
