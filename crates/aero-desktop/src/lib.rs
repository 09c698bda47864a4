//! Aero maintenance desktop
//!
//! This crate provides the core of a maintenance page dressed up as a
//! Windows 7 desktop:
//! - Floating windows (open, drag, resize, minimize, maximize, close)
//! - A registry enforcing single-instance window kinds
//! - Content panels (radio and video streams, news feed, contact form, dialogs)
//! - Maintenance countdown and fake transfer progress
//! - A particle "cosmic expansion" background
//!
//! ## Architecture
//!
//! The crate is organized into focused modules:
//!
//! - [`math`]: Core geometry types (`Vec2`, `Rect`, `Size`)
//! - [`window`]: Window instances, lifecycle state machine, registry, effects
//! - [`input`]: Drag and resize primitives, gesture router, listener model
//! - [`content`]: Panel content plugged into window bodies
//! - [`maintenance`]: Countdown and progress simulation
//! - [`particles`]: Expansion background simulation
//! - [`config`]: Page configuration
//!
//! ## Example
//!
//! ```rust
//! use aero_desktop::{DesktopEngine, PageConfig, PointerTarget, Viewport, WindowKind};
//!
//! let mut engine = DesktopEngine::new(PageConfig::default(), Viewport::new(1280.0, 800.0));
//! let (opened, effects) = engine.show_dialog("Aviso", "Site em manutenção", 0.0);
//! assert!(!effects.is_empty());
//!
//! // Drag the dialog by its title bar
//! let frame = engine.window(opened.id()).unwrap().geometry;
//! engine.pointer_down(opened.id(), PointerTarget::TitleBar, frame.x + 10.0, frame.y + 10.0, 0.0);
//! engine.pointer_move(frame.x + 110.0, frame.y + 60.0);
//! engine.pointer_up();
//!
//! let moved = engine.window(opened.id()).unwrap().geometry;
//! assert!((moved.x - (frame.x + 100.0)).abs() < 0.001);
//! assert_eq!(engine.windows().count_of_kind(WindowKind::Dialog), 1);
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable without browser
//! 2. **Effects, not DOM calls**: The engine returns effects; the adapter applies them
//! 3. **Time Abstraction**: Timers use an injected clock for deterministic testing

pub mod math;
pub mod window;
pub mod input;
pub mod content;
pub mod maintenance;
pub mod particles;
pub mod config;

mod engine;
mod timer;
mod viewport;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

// Re-export core types for convenience
pub use math::{ChromeStyle, Rect, Size, Vec2, CHROME_STYLE};
pub use window::{
    Effect, GestureKind, LifecycleEvent, OpenOutcome, PointerTarget, ResizeDirection, TitleButton, TransitionError,
    WindowConfig, WindowId, WindowInstance, WindowKind, WindowRegistry, WindowState,
};
pub use input::{calculate_resize, DocumentListeners, DragGesture, GestureRouter, ResizeGesture};
pub use content::{ContentAction, ContentEvent, PanelContent};
pub use config::{ConfigError, PageConfig};
pub use particles::{ExpansionParams, Universe};

pub use engine::DesktopEngine;
pub use timer::{TimerAction, TimerId, TimerQueue, PAGE_OWNER};
pub use viewport::Viewport;
