//! Error types for the marshalling layer.

use thiserror::Error;

use crate::cell::Cell;

/// Errors raised while touching abstract machine memory or arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmxError {
    /// The address does not name a cell inside the data segment.
    #[error("address {0:#x} is outside the data segment")]
    BadAddress(Cell),

    /// The native was called with fewer arguments than it reads.
    #[error("argument {index} missing, native received {count}")]
    MissingArgument { index: usize, count: usize },
}

/// Result type alias for marshalling operations.
pub type Result<T> = std::result::Result<T, AmxError>;
