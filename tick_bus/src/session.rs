//! Sessions - a simulation clock paired with a communication manager.

use sim_clock::{Clock, VariableIncrementClock};
use tracing::trace;

use crate::error::Result;
use crate::manager::{CommunicationManager, TickReport};

/// Steps simulation time and the bus together.
///
/// Each step first advances the clock, then runs one manager tick, so agents
/// holding [`Timer`](sim_clock::Timer)s can compare against the time of the
/// step they are in.
#[derive(Debug)]
pub struct Session {
    clock: VariableIncrementClock,
    manager: CommunicationManager,
}

impl Session {
    pub fn new(manager: CommunicationManager) -> Self {
        Self {
            clock: VariableIncrementClock::new(),
            manager,
        }
    }

    /// Advance the clock by `dt` and run one tick. A non-positive `dt` fails
    /// before anything runs.
    pub fn step(&mut self, dt: f32) -> Result<TickReport> {
        self.clock.tick(dt)?;
        trace!(time = self.clock.time(), dt, "session step");
        Ok(self.manager.update())
    }

    /// Step by the manager's configured default increment.
    pub fn advance(&mut self) -> Result<TickReport> {
        self.step(self.manager.config().default_step)
    }

    pub fn clock(&self) -> &VariableIncrementClock {
        &self.clock
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn manager(&self) -> &CommunicationManager {
        &self.manager
    }

    /// Mutable access for engaging and disengaging agents between steps.
    pub fn manager_mut(&mut self) -> &mut CommunicationManager {
        &mut self.manager
    }
}
