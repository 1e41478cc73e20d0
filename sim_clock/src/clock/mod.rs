//! Clocks - the source of simulation time.

mod variable_increment;

pub use variable_increment::*;

use thiserror::Error;

/// Errors raised by clock and timer preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClockError {
    /// Clocks only move forward.
    #[error("time increment must be positive, got {0}")]
    NonPositiveIncrement(f32),

    /// Timer durations cannot be negative.
    #[error("timer duration must not be negative, got {0}")]
    NegativeDuration(f32),
}

/// Read access to simulation time.
pub trait Clock {
    /// Total time elapsed since the clock was created.
    fn time(&self) -> f32;

    /// Size of the most recent step.
    fn time_increment(&self) -> f32;
}
