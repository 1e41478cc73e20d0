//! # Tick Bus
//!
//! A tick-based publish/subscribe bus for a fixed set of agents that exchange
//! typed messages once per simulation step.
//!
//! ## Core Components
//!
//! - **packet**: Immutable `{sender_id, payload}` envelopes
//! - **channel**: Ordered packet sequences and their double-buffered form
//! - **batch**: The type-indexed registry of channels and its read-only view
//! - **manager**: Agents, submissions and the per-tick update protocol
//! - **session**: A clock paired with a manager, stepped by the host
//! - **config**: TOML-backed settings
//!
//! ## Tick Protocol
//!
//! - **Perceive**: Every agent reads the front buffers, which hold what was
//!   written during the previous tick
//! - **Act**: Every agent writes through a submission that is only valid for
//!   its own turn; writes land in the back buffers
//! - **Flush**: Buffers swap, then the demoted buffers are cleared
//!
//! Because all reads in a tick see the same front buffers, the order in which
//! agents are visited never changes what they perceive.

pub mod batch;
pub mod channel;
pub mod config;
pub mod error;
pub mod manager;
pub mod packet;
pub mod session;

pub use batch::*;
pub use channel::*;
pub use config::*;
pub use error::*;
pub use manager::*;
pub use packet::*;
pub use session::*;
