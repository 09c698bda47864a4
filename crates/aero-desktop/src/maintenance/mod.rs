//! Maintenance status shown in the primary window

mod countdown;
mod progress;

pub use countdown::{Countdown, Remaining};
pub use progress::{ProgressSimulator, ProgressSnapshot, Step, PROGRESS_CAP};
