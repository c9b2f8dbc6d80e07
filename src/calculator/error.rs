//! Errors raised by the expression engine.

use thiserror::Error;

/// Failures the engine absorbs and reflects as an `Error` display.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// The buffer could not be shaped into `operand operator operand`.
    #[error("cannot reduce buffer: {0}")]
    MalformedReduction(String),

    /// An operand's text does not parse as a number.
    #[error("invalid operand '{0}'")]
    InvalidOperand(String),

    /// A key that maps to no token.
    #[error("unrecognized key '{0}'")]
    InvalidKey(String),
}
