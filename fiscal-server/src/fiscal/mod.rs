//! Fiscal printing pipeline
//!
//! Everything between an already-parsed request and the vendor
//! executable's verdict:
//!
//! - [`terminal`] - terminal directory resolution (traversal guard)
//! - [`locks`] - per-terminal mutual exclusion registry
//! - [`writer`] - durable command-file write with read-back validation
//! - [`runner`] - subprocess invocation behind a trait seam
//! - [`executor`] - outcome classification and bounded retry
//! - [`service`] - orchestration, one public entry per fiscal operation

pub mod executor;
pub mod locks;
pub mod runner;
pub mod service;
pub mod terminal;
pub mod types;
pub mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use executor::{ExecutionError, FiscalExecutor, RetryPolicy};
pub use locks::TerminalLocks;
pub use runner::{CommandRunner, FiscalCommand, InvocationStyle, ProcessOutput, ProcessRunner};
pub use service::{FiscalService, ReportKind};

use fiscal_protocol::ProtocolError;

/// Failures of the fiscal pipeline
#[derive(Debug, Error)]
pub enum FiscalError {
    /// Terminal directory missing or base path not usable
    #[error("Unknown terminal '{terminal}': {reason}")]
    UnknownTerminal { terminal: String, reason: String },

    /// Identifier rejected before touching the filesystem
    #[error("Invalid terminal identifier: {0}")]
    InvalidTerminal(String),

    /// Invoice could not be encoded (whole request rejected)
    #[error("Invoice encoding failed: {0}")]
    Encode(#[from] ProtocolError),

    /// `ReadFpStatus` left a report we could not parse
    #[error("Status report unreadable: {0}")]
    MalformedStatus(ProtocolError),

    /// Disk content never matched the written commands within the
    /// validation budget
    #[error(
        "Command file validation failed: expected {expected_bytes} bytes on disk, last read {actual_bytes} bytes"
    )]
    WriteValidation {
        expected_bytes: usize,
        actual_bytes: usize,
        file: PathBuf,
    },

    /// Filesystem error while writing or reading the command file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Executable invocation failed or was rejected by the printer
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl FiscalError {
    /// Errors caused by the request rather than the system; mapped to
    /// HTTP 400 by the API layer.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FiscalError::UnknownTerminal { .. }
                | FiscalError::InvalidTerminal(_)
                | FiscalError::Encode(_)
        )
    }
}

/// Result type for fiscal pipeline operations
pub type FiscalResult<T> = Result<T, FiscalError>;
