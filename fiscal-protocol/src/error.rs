//! Error types for the protocol library

use thiserror::Error;

/// Protocol error types
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A numeric field could not be represented in the fixed-width format
    #[error("Field does not fit fixed width {width}: {value}")]
    FieldOverflow { width: usize, value: String },

    /// Payment slot outside the 1-99 range the protocol addresses
    #[error("Payment slot out of range (1-99): {0}")]
    SlotOutOfRange(i64),

    /// Status line from ReadFpStatus did not contain the expected tokens
    #[error("Unparseable status line: {0:?}")]
    MalformedStatusLine(String),
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
