//! The agent contract.

use std::cell::RefCell;
use std::rc::Rc;

use super::{DataSubmission, TickContext};
use crate::batch::BatchView;

/// A participant driven by the communication manager once per tick.
///
/// Within a tick an agent first perceives, then acts. Everything perceived in
/// tick N was written during tick N-1, so the order in which agents are
/// visited does not affect what they see.
pub trait Agent {
    /// Stable, non-blank identifier. Packets the agent submits carry it as
    /// their sender id.
    fn id(&self) -> &str;

    /// Read the packets made visible by the last flush. Agents update their
    /// own state here; the channels cannot be written.
    fn perceive(&mut self, ctx: &TickContext<'_>, channels: &BatchView<'_>);

    /// Submit zero or more packets for the next tick.
    fn act(&mut self, submission: &DataSubmission);
}

/// Shared handle to an engaged agent. The host keeps its own clone to
/// inspect the agent between ticks.
pub type AgentHandle = Rc<RefCell<dyn Agent>>;
