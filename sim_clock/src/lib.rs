//! # Sim Clock
//!
//! Simulation time for tick-driven systems. A clock only moves when the
//! host steps it, so every reading is reproducible from the sequence of
//! increments that produced it.

pub mod clock;
pub mod timer;

pub use clock::*;
pub use timer::*;
