//! Pure window lifecycle state machine
//!
//! `next_state` decides transitions without touching geometry, listeners or
//! the DOM. The engine turns an accepted transition into effects.

use super::{WindowKind, WindowState};

/// Input to the lifecycle state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Minimize button pressed
    Minimize,
    /// Minimize flash interval elapsed
    MinimizeElapsed,
    /// Maximize button pressed
    ToggleMaximize,
    /// Forced maximize on a narrow viewport (allowed for every kind)
    PinMaximized,
    /// Close requested
    Close,
    /// Listeners, timers and content released
    TeardownComplete,
}

/// Rejected transition
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Fixed-size kinds ignore minimize and maximize
    #[error("{kind:?} windows cannot be {action}")]
    NotResizable {
        kind: WindowKind,
        action: &'static str,
    },

    /// The window has already been torn down
    #[error("window is closed")]
    Closed,

    /// Event has no meaning in the current state
    #[error("{event:?} is not valid while {state:?}")]
    Invalid {
        state: WindowState,
        event: LifecycleEvent,
    },
}

/// Compute the next state for `event`
///
/// `prev` is the state a minimized window returns to.
pub fn next_state(
    kind: WindowKind,
    state: WindowState,
    prev: Option<WindowState>,
    event: LifecycleEvent,
) -> Result<WindowState, TransitionError> {
    use LifecycleEvent as E;
    use WindowState as S;

    if state == S::Closed {
        return Err(TransitionError::Closed);
    }

    let invalid = || TransitionError::Invalid { state, event };

    match (event, state) {
        (E::Minimize, _) if !kind.is_resizable() => Err(TransitionError::NotResizable {
            kind,
            action: "minimized",
        }),
        (E::Minimize, S::Normal | S::Maximized) => Ok(S::Minimized),
        (E::Minimize, S::Minimized) if kind.minimize_toggles() => Ok(prev.unwrap_or(S::Normal)),

        (E::MinimizeElapsed, S::Minimized) => Ok(prev.unwrap_or(S::Normal)),

        (E::ToggleMaximize, _) if !kind.is_resizable() => Err(TransitionError::NotResizable {
            kind,
            action: "maximized",
        }),
        (E::ToggleMaximize, S::Normal) => Ok(S::Maximized),
        (E::ToggleMaximize, S::Maximized) => Ok(S::Normal),

        (E::PinMaximized, S::Normal) => Ok(S::Maximized),

        (E::Close, S::Normal | S::Minimized | S::Maximized) => Ok(S::Closing),
        (E::TeardownComplete, S::Closing) => Ok(S::Closed),

        _ => Err(invalid()),
    }
}
