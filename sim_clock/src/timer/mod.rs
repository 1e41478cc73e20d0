//! Countdown timers measured against a [`Clock`].

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, ClockError};

/// A countdown that rings once the clock has moved past its duration.
///
/// The timer does not own a clock; callers pass the clock it should read
/// to [`Timer::start`] and [`Timer::update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timer {
    total: f32,
    elapsed: f32,
    remaining: f32,
    is_ticking: bool,
    is_ringing: bool,
    start_time: f32,
}

impl Timer {
    /// Create a stopped timer with the given duration.
    pub fn new(duration: f32) -> Result<Self, ClockError> {
        let mut timer = Self::default();
        timer.set(duration)?;
        Ok(timer)
    }

    /// Change the duration and reset the timer.
    pub fn set(&mut self, duration: f32) -> Result<(), ClockError> {
        if !(duration >= 0.0) {
            return Err(ClockError::NegativeDuration(duration));
        }
        self.total = duration;
        self.reset();
        Ok(())
    }

    /// Stop the timer and restore the full duration.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.remaining = self.total;
        self.is_ticking = false;
        self.is_ringing = false;
    }

    /// Start counting from the clock's current time.
    pub fn start(&mut self, clock: &impl Clock) {
        self.start_time = clock.time();
        self.is_ticking = true;
    }

    /// Re-read the clock. Returns whether the timer is ringing.
    pub fn update(&mut self, clock: &impl Clock) -> bool {
        if !self.is_ticking {
            return false;
        }
        self.elapsed = clock.time() - self.start_time;
        self.remaining = self.total - self.elapsed;
        self.is_ringing = self.remaining <= 0.0;
        self.is_ringing
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_ticking(&self) -> bool {
        self.is_ticking
    }

    pub fn is_ringing(&self) -> bool {
        self.is_ringing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VariableIncrementClock;

    #[test]
    fn test_new_timer_is_stopped() {
        let timer = Timer::new(3.0).unwrap();
        assert!(!timer.is_ticking());
        assert!(!timer.is_ringing());
        assert_eq!(timer.remaining(), 3.0);
    }

    #[test]
    fn test_negative_duration_rejected() {
        assert_eq!(Timer::new(-1.0).unwrap_err(), ClockError::NegativeDuration(-1.0));
    }

    #[test]
    fn test_stopped_timer_ignores_updates() {
        let mut clock = VariableIncrementClock::new();
        let mut timer = Timer::new(1.0).unwrap();

        clock.tick(5.0).unwrap();
        assert!(!timer.update(&clock));
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_timer_rings_after_duration() {
        let mut clock = VariableIncrementClock::new();
        clock.tick(10.0).unwrap();

        let mut timer = Timer::new(2.0).unwrap();
        timer.start(&clock);

        clock.tick(1.0).unwrap();
        assert!(!timer.update(&clock));
        assert!((timer.remaining() - 1.0).abs() < 0.001);

        clock.tick(1.0).unwrap();
        assert!(timer.update(&clock));
        assert!(timer.is_ringing());
    }

    #[test]
    fn test_reset_stops_timer() {
        let mut clock = VariableIncrementClock::new();
        let mut timer = Timer::new(1.0).unwrap();
        timer.start(&clock);
        clock.tick(2.0).unwrap();
        timer.update(&clock);

        timer.reset();

        assert!(!timer.is_ticking());
        assert!(!timer.is_ringing());
        assert_eq!(timer.remaining(), 1.0);
    }

    #[test]
    fn test_zero_duration_rings_immediately() {
        let clock = VariableIncrementClock::new();
        let mut timer = Timer::new(0.0).unwrap();
        timer.start(&clock);
        assert!(timer.update(&clock));
    }
}
