//! A clock stepped by caller-chosen increments.

use serde::{Deserialize, Serialize};

use super::{Clock, ClockError};

/// Clock advanced manually, one increment at a time.
///
/// Two clocks compare equal when they show the same time, regardless of
/// the increments taken to get there.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VariableIncrementClock {
    time: f32,
    time_increment: f32,
}

impl VariableIncrementClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `increment`, which must be positive.
    pub fn tick(&mut self, increment: f32) -> Result<(), ClockError> {
        // NaN fails this comparison too
        if !(increment > 0.0) {
            return Err(ClockError::NonPositiveIncrement(increment));
        }
        self.time += increment;
        self.time_increment = increment;
        Ok(())
    }
}

impl Clock for VariableIncrementClock {
    fn time(&self) -> f32 {
        self.time
    }

    fn time_increment(&self) -> f32 {
        self.time_increment
    }
}

impl PartialEq for VariableIncrementClock {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl std::fmt::Display for VariableIncrementClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VariableIncrementClock {{ time = {}, time_increment = {} }}",
            self.time, self.time_increment
        )
    }
}
