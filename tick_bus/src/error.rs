//! Error types shared by every bus operation.

use sim_clock::ClockError;
use thiserror::Error;

/// Errors surfaced by the bus. A failed call never leaves partial state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BusError {
    /// A caller-supplied value is malformed, such as a blank sender id.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A type-erased payload does not match the channel's data type.
    #[error("Type mismatch: payload is not a {expected}")]
    TypeMismatch { expected: &'static str },

    /// The data type was never registered with the channel batch.
    #[error("Unsupported data type: {0}")]
    UnsupportedType(&'static str),

    /// The operation is not allowed in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Configuration could not be read or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),
}

pub type Result<T> = std::result::Result<T, BusError>;
