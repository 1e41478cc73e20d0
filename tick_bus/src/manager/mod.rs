//! Communication manager - owns the channel batch and drives each tick.
//!
//! One call to [`CommunicationManager::update`] is one tick:
//! 1. **Perceive**: each engaged agent reads the front buffers
//! 2. **Act**: right after perceiving, the agent writes through a fresh
//!    [`DataSubmission`] that stops working when its turn is over
//! 3. **Flush**: all channels swap, then the demoted buffers are cleared
//!
//! Agents are visited in engagement order.

mod agent;
mod submission;

pub use agent::*;
pub use submission::*;

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use uuid::Uuid;

use crate::batch::{BatchView, ChannelBatch, ChannelBatchBuilder};
use crate::config::BusConfig;
use crate::error::{BusError, Result};
use crate::packet::Payload;

/// Unique identifier for a communication manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagerId(pub Uuid);

impl ManagerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ManagerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ManagerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State shared between a manager and the submissions it hands out.
#[derive(Debug)]
pub(crate) struct BusState {
    pub(crate) batch: ChannelBatch,
    /// Generation of the submission currently allowed to write, if any.
    pub(crate) active: Option<u64>,
    next_generation: u64,
    pub(crate) log_packets: bool,
}

impl BusState {
    pub(crate) fn new(batch: ChannelBatch, config: &BusConfig) -> Self {
        Self {
            batch,
            active: None,
            next_generation: 0,
            log_packets: config.log_packets,
        }
    }

    /// Start a new submission generation, superseding the current one.
    pub(crate) fn open_submission(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.active = Some(generation);
        generation
    }

    pub(crate) fn close_submission(&mut self) {
        self.active = None;
    }
}

/// What agents learn about the tick they are perceiving in.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    tick: u64,
    manager_id: ManagerId,
    agent_ids: &'a [String],
}

impl<'a> TickContext<'a> {
    /// Zero-based index of the current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn manager_id(&self) -> ManagerId {
        self.manager_id
    }

    /// Ids of all engaged agents, in visiting order.
    pub fn agent_ids(&self) -> &'a [String] {
        self.agent_ids
    }
}

/// Summary of one completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Index of the tick that ran.
    pub tick: u64,
    /// Number of agents that perceived and acted.
    pub agents: usize,
    /// Packets promoted to the front buffers by the flush.
    pub packets_flushed: usize,
}

/// Builds a [`CommunicationManager`] for a fixed set of data types.
#[derive(Debug, Default)]
pub struct CommunicationManagerBuilder {
    channels: ChannelBatchBuilder,
    config: BusConfig,
}

impl CommunicationManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Carry payloads of type `T`. Repeating a type has no effect.
    pub fn support<T: Payload>(mut self) -> Self {
        self.channels = self.channels.with_channel::<T>();
        self
    }

    pub fn with_config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> CommunicationManager {
        let batch = self.channels.build();
        debug!(%batch, "communication manager built");
        CommunicationManager {
            id: ManagerId::new(),
            state: Rc::new(RefCell::new(BusState::new(batch, &self.config))),
            agents: Vec::new(),
            tick: 0,
            config: self.config,
        }
    }
}

/// Routes typed packets between engaged agents, one tick at a time.
pub struct CommunicationManager {
    id: ManagerId,
    state: Rc<RefCell<BusState>>,
    /// Engaged agents keyed by id, in engagement order.
    agents: Vec<(String, AgentHandle)>,
    tick: u64,
    config: BusConfig,
}

impl CommunicationManager {
    pub fn builder() -> CommunicationManagerBuilder {
        CommunicationManagerBuilder::new()
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Number of ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Read-only access to the front buffers, for inspection between ticks.
    ///
    /// The closure runs against the same view agents get while perceiving.
    pub fn with_channels<R>(&self, f: impl FnOnce(&BatchView<'_>) -> R) -> R {
        let state = self.state.borrow();
        f(&BatchView::new(&state.batch))
    }

    /// Start visiting `agent` every tick. Returns `false` if an agent with
    /// the same id is already engaged.
    ///
    /// # Panics
    ///
    /// Panics if the agent is currently mutably borrowed.
    pub fn engage(&mut self, agent: AgentHandle) -> Result<bool> {
        let id = agent.borrow().id().to_owned();
        if id.trim().is_empty() {
            return Err(BusError::InvalidArgument("agent id must not be blank".into()));
        }
        if self.is_engaged(&id) {
            return Ok(false);
        }
        debug!(agent_id = %id, manager_id = %self.id, "agent engaged");
        self.agents.push((id, agent));
        Ok(true)
    }

    /// Stop visiting the agent with the given id. Returns whether it was
    /// engaged.
    pub fn disengage(&mut self, agent_id: &str) -> Result<bool> {
        if agent_id.trim().is_empty() {
            return Err(BusError::InvalidArgument("agent id must not be blank".into()));
        }
        let Some(position) = self.agents.iter().position(|(id, _)| id == agent_id) else {
            return Ok(false);
        };
        self.agents.remove(position);
        debug!(%agent_id, manager_id = %self.id, "agent disengaged");
        Ok(true)
    }

    pub fn is_engaged(&self, agent_id: &str) -> bool {
        self.agents.iter().any(|(id, _)| id == agent_id)
    }

    /// Ids of engaged agents, in visiting order.
    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Run one tick: every agent perceives then acts, then all channels
    /// flush.
    ///
    /// # Panics
    ///
    /// Panics if an engaged agent is already borrowed when its turn comes.
    pub fn update(&mut self) -> TickReport {
        let agent_ids = self.agent_ids();
        let ctx = TickContext {
            tick: self.tick,
            manager_id: self.id,
            agent_ids: &agent_ids,
        };

        for (id, handle) in &self.agents {
            let mut agent = handle.borrow_mut();
            {
                let state = self.state.borrow();
                agent.perceive(&ctx, &BatchView::new(&state.batch));
            }

            let generation = self.state.borrow_mut().open_submission();
            let submission =
                DataSubmission::new(self.id, id.clone(), generation, Rc::clone(&self.state));
            agent.act(&submission);
            self.state.borrow_mut().close_submission();
        }

        let mut state = self.state.borrow_mut();
        let packets_flushed = state.batch.pending_count();
        state.batch.swap_all();
        state.batch.clear_all();

        let report = TickReport {
            tick: self.tick,
            agents: self.agents.len(),
            packets_flushed,
        };
        self.tick += 1;

        debug!(
            tick = report.tick,
            agents = report.agents,
            packets_flushed = report.packets_flushed,
            "tick complete"
        );
        report
    }
}

impl std::fmt::Debug for CommunicationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommunicationManager")
            .field("id", &self.id)
            .field("agents", &self.agent_ids())
            .field("tick", &self.tick)
            .finish()
    }
}

impl std::fmt::Display for CommunicationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CommunicationManager {{ channels = {} }}",
            self.state.borrow().batch
        )
    }
}
