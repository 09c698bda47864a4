//! Pointer handling: drag, resize and title bar buttons

use crate::input::{ActiveGesture, DragGesture, Gesture, ResizeGesture};
use crate::math::Vec2;
use crate::window::{Effect, GestureKind, PointerTarget, TitleButton, WindowId, WindowKind, WindowState};
use super::DesktopEngine;

fn release_effects(released: &ActiveGesture) -> Vec<Effect> {
    let mut effects = vec![Effect::DetachDocumentListeners {
        window_id: released.window_id,
    }];
    if released.gesture.kind() == GestureKind::Drag {
        effects.push(Effect::SetDragCursor {
            window_id: released.window_id,
            grabbing: false,
        });
    }
    effects
}

impl DesktopEngine {
    /// Handle pointer down on a window
    pub fn pointer_down(&mut self, id: WindowId, target: PointerTarget, x: f32, y: f32, now_ms: f64) -> Vec<Effect> {
        if self.pointer_blocked(now_ms) {
            log::debug!("pointer-down ignored: close guard active");
            return Vec::new();
        }
        if !self.registry.is_live(id) {
            return Vec::new();
        }
        let pointer = Vec2::new(x, y);
        if !pointer.is_finite() {
            return Vec::new();
        }

        let mut effects = self.focus(id);
        let gesture = match self.registry.get(id) {
            Some(window) if window.state == WindowState::Normal => match target {
                PointerTarget::TitleBar => DragGesture::begin(target, &window.geometry, pointer).map(Gesture::Drag),
                PointerTarget::ResizeHandle(direction) if window.resizable() && window.handles_installed() => Some(
                    Gesture::Resize(ResizeGesture::begin(direction, window.geometry, pointer, window.min_size)),
                ),
                _ => None,
            },
            _ => None,
        };

        if let Some(gesture) = gesture {
            effects.extend(self.start_gesture(id, gesture));
        }
        effects
    }

    fn start_gesture(&mut self, id: WindowId, gesture: Gesture) -> Vec<Effect> {
        let mut effects = Vec::new();
        let listeners = self.listeners.add_gesture(id);
        if let Some(replaced) = self.router.start(id, gesture, listeners) {
            self.listeners.remove(&replaced.listeners);
            effects.extend(release_effects(&replaced));
        }
        effects.push(Effect::AttachDocumentListeners {
            window_id: id,
            gesture: gesture.kind(),
        });
        if gesture.kind() == GestureKind::Drag {
            effects.push(Effect::SetDragCursor {
                window_id: id,
                grabbing: true,
            });
        }
        effects
    }

    /// Handle document-level pointer move
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Vec<Effect> {
        let Some(active) = self.router.active().copied() else {
            return Vec::new();
        };
        let pointer = Vec2::new(x, y);
        if !pointer.is_finite() {
            return Vec::new();
        }

        let id = active.window_id;
        let Some(window) = self.registry.get_mut(id) else {
            // Owner vanished without teardown; drop the gesture
            return self.end_gesture();
        };
        if window.state != WindowState::Normal {
            return Vec::new();
        }

        let rect = active.gesture.apply(&window.geometry, pointer);
        if !rect.is_finite() {
            return Vec::new();
        }
        window.geometry = rect;
        window.centered = false;
        vec![Effect::SetGeometry {
            window_id: id,
            rect,
            centered: false,
        }]
    }

    /// Handle document-level pointer up
    pub fn pointer_up(&mut self) -> Vec<Effect> {
        self.end_gesture()
    }

    /// End the active gesture, whoever owns it
    pub fn end_gesture(&mut self) -> Vec<Effect> {
        match self.router.end() {
            Some(released) => {
                self.listeners.remove(&released.listeners);
                release_effects(&released)
            }
            None => Vec::new(),
        }
    }

    /// End the active gesture if `id` owns it
    pub(crate) fn end_gesture_for(&mut self, id: WindowId) -> Vec<Effect> {
        match self.router.cancel_for(id) {
            Some(released) => {
                self.listeners.remove(&released.listeners);
                release_effects(&released)
            }
            None => Vec::new(),
        }
    }

    /// Title bar control button click
    pub fn click_button(&mut self, id: WindowId, button: TitleButton, now_ms: f64) -> Vec<Effect> {
        match button {
            TitleButton::Minimize => self.minimize(id, now_ms),
            TitleButton::Maximize => self.toggle_maximize(id),
            TitleButton::Close => self.close_window(id, now_ms),
        }
    }

    /// Click on the overlay behind a window; closes dialogs
    pub fn click_overlay(&mut self, id: WindowId, now_ms: f64) -> Vec<Effect> {
        match self.registry.get(id) {
            Some(window) if window.kind == WindowKind::Dialog => self.close_window(id, now_ms),
            _ => Vec::new(),
        }
    }
}
