//! Window management module
//!
//! Provides window instances, the lifecycle state machine, the registry that
//! enforces singleton kinds, and the effects the engine emits for the DOM.

#[allow(clippy::module_inception)]
mod window;
mod config;
mod region;
mod effect;
pub mod lifecycle;
mod registry;

pub use window::{WindowInstance, WindowKind, WindowState};
pub(crate) use window::RestoreSnapshot;
pub use config::WindowConfig;
pub use region::{PointerTarget, ResizeDirection, TitleButton};
pub use effect::{Effect, GestureKind};
pub use lifecycle::{LifecycleEvent, TransitionError};
pub use registry::{OpenOutcome, WindowRegistry};

/// Unique window identifier
pub type WindowId = u64;
