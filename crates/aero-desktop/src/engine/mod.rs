//! Desktop engine coordinating all components
//!
//! This module is split into focused submodules:
//! - `windows`: Window lifecycle, open/close and content wiring
//! - `input`: Pointer gestures and title bar buttons
//! - `timers`: Timer dispatch and content event routing
//!
//! Every operation returns the [`Effect`]s to apply, in order.

mod windows;
mod input;
mod timers;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PageConfig;
use crate::input::{ActiveGesture, DocumentListeners, GestureRouter};
use crate::timer::TimerQueue;
use crate::viewport::Viewport;
use crate::window::{Effect, WindowId, WindowInstance, WindowRegistry, WindowState};

/// Desktop engine coordinating all desktop components
///
/// Owns the window registry, the gesture router, the model of the
/// document-level listeners, the timer queue and the viewport. Time is
/// injected: operations that schedule or check timers take `now_ms`, the
/// page clock in epoch milliseconds.
#[derive(Debug)]
pub struct DesktopEngine {
    /// Page configuration
    pub config: PageConfig,
    /// Viewport used for centering and maximized layout
    pub viewport: Viewport,
    pub(crate) registry: WindowRegistry,
    pub(crate) router: GestureRouter,
    pub(crate) listeners: DocumentListeners,
    pub(crate) timers: TimerQueue,
    /// Pointer-down is ignored until this time
    pub(crate) pointer_guard_until: f64,
    /// Seeds per-window randomness (progress simulation)
    pub(crate) rng: StdRng,
}

impl Default for DesktopEngine {
    fn default() -> Self {
        Self::new(PageConfig::default(), Viewport::default())
    }
}

impl DesktopEngine {
    /// Create an engine with no windows
    pub fn new(config: PageConfig, mut viewport: Viewport) -> Self {
        viewport.mobile_breakpoint = config.window.mobile_breakpoint;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            viewport,
            registry: WindowRegistry::new(),
            router: GestureRouter::new(),
            listeners: DocumentListeners::new(),
            timers: TimerQueue::new(),
            pointer_guard_until: f64::NEG_INFINITY,
            rng,
        }
    }

    /// Window by ID
    pub fn window(&self, id: WindowId) -> Option<&WindowInstance> {
        self.registry.get(id)
    }

    /// All tracked windows
    pub fn windows(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Document-level listener set
    pub fn listeners(&self) -> &DocumentListeners {
        &self.listeners
    }

    /// Pending timers
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Gesture in progress
    pub fn active_gesture(&self) -> Option<&ActiveGesture> {
        self.router.active()
    }

    /// Whether pointer-down is being ignored at `now_ms`
    pub fn pointer_blocked(&self, now_ms: f64) -> bool {
        now_ms < self.pointer_guard_until
    }

    /// Resize the viewport and re-lay out maximized windows
    pub fn resize_viewport(&mut self, width: f32, height: f32) -> Vec<Effect> {
        if !self.viewport.resize(width, height) {
            log::debug!("ignoring viewport size {width}x{height}");
            return Vec::new();
        }
        let rect = self.viewport.maximized_rect();
        let mut effects = Vec::new();
        for id in self.registry.ids() {
            if let Some(window) = self.registry.get_mut(id) {
                let maximized = window.state == WindowState::Maximized
                    || (window.state == WindowState::Minimized && window.prev_state == Some(WindowState::Maximized));
                if maximized {
                    window.geometry = rect;
                    effects.push(Effect::SetGeometry {
                        window_id: id,
                        rect,
                        centered: false,
                    });
                }
            }
        }
        effects
    }
}
