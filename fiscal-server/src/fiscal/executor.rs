//! Outcome classification and retry policy
//!
//! The executor owns the whole decision procedure for an invocation:
//! success gate, response-shape parsing, the transient/fatal split and
//! the bounded retry loop. Callers must never re-invoke on their own.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, instrument, warn};

use fiscal_protocol::{SendFileOutcome, contains_success_marker, parse_send_file_output};

use crate::fiscal::runner::{CommandRunner, FiscalCommand, RunnerError};

/// Bounded fixed-backoff retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(300),
        }
    }
}

/// Classified execution failures
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Executable missing from the terminal directory
    #[error("Fiscal executable not installed or misconfigured: {0}")]
    NotInstalled(std::path::PathBuf),

    /// Hard wall-clock timeout; the printer never answered
    #[error("No response from fiscal printer within {0:?}")]
    NoResponse(Duration),

    /// OS-level launch failure
    #[error("Could not launch fiscal executable: {0}")]
    Launch(std::io::Error),

    /// Exit status and stdout both lacked any success indication
    #[error("Fiscal command failed. stdout: {stdout:?} stderr: {stderr:?}")]
    CommandFailed { stdout: String, stderr: String },

    /// stdout matched none of the known response shapes
    #[error("Unrecognized fiscal response format: {stdout:?}")]
    UnrecognizedResponse { stdout: String },

    /// The executable reported a vendor error code
    #[error("Fiscal executable reported error {code}. Response: {stdout:?}")]
    Vendor { code: u64, stdout: String },

    /// Printer stopped partway through the file; a protocol-level
    /// rejection, never retried
    #[error(
        "Printer processed {processed} of {expected} commands. Response: {stdout:?}"
    )]
    Partial {
        processed: u64,
        expected: u64,
        stdout: String,
    },

    /// Transient zero-processed responses exhausted the retry budget
    #[error(
        "Printer processed 0 of {expected} commands after {attempts} attempts. Response: {stdout:?}"
    )]
    ZeroProcessed {
        expected: u64,
        attempts: u32,
        stdout: String,
    },
}

impl From<RunnerError> for ExecutionError {
    fn from(e: RunnerError) -> Self {
        match e {
            RunnerError::NotInstalled(path) => ExecutionError::NotInstalled(path),
            RunnerError::NoResponse(timeout) => ExecutionError::NoResponse(timeout),
            RunnerError::Io(io) => ExecutionError::Launch(io),
        }
    }
}

enum Outcome {
    Success(String),
    /// Zero processed with a nonzero expectation; worth another try
    Transient(String),
    Fatal(ExecutionError),
}

/// Drives the fiscal executable and classifies its answers
pub struct FiscalExecutor {
    runner: Arc<dyn CommandRunner>,
    executable: String,
    retry: RetryPolicy,
}

impl FiscalExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, executable: String, retry: RetryPolicy) -> Self {
        Self {
            runner,
            executable,
            retry,
        }
    }

    /// Execute a command in a terminal directory.
    ///
    /// `expected_lines` applies to `SendFileCmd` only: the number of
    /// commands the printer must acknowledge. Returns the raw stdout
    /// on success for diagnosis upstream.
    #[instrument(skip(self), fields(command = command.name(), dir = %terminal_dir.display()))]
    pub async fn execute(
        &self,
        command: &FiscalCommand,
        terminal_dir: &Path,
        expected_lines: Option<usize>,
    ) -> Result<String, ExecutionError> {
        let program = terminal_dir.join(&self.executable);
        let mut last_transient = String::new();

        for attempt in 1..=self.retry.max_attempts {
            let output = self.runner.run(&program, command, terminal_dir).await?;
            if !output.stderr.is_empty() {
                warn!(stderr = %output.stderr, attempt, "fiscal executable wrote to stderr");
            }

            match classify(command, output.exit_ok, &output.stdout, &output.stderr, expected_lines) {
                Outcome::Success(stdout) => {
                    info!(attempt, "fiscal command accepted");
                    return Ok(stdout);
                }
                Outcome::Transient(stdout) => {
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        "printer acknowledged 0 commands, retrying"
                    );
                    last_transient = stdout;
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
                Outcome::Fatal(err) => return Err(err),
            }
        }

        Err(ExecutionError::ZeroProcessed {
            expected: expected_lines.unwrap_or(0) as u64,
            attempts: self.retry.max_attempts,
            stdout: last_transient,
        })
    }
}

/// The decision procedure for one captured invocation.
fn classify(
    command: &FiscalCommand,
    exit_ok: bool,
    stdout: &str,
    stderr: &str,
    expected_lines: Option<usize>,
) -> Outcome {
    // Some builds exit nonzero on success but always print a marker
    if !exit_ok && !contains_success_marker(stdout) {
        return Outcome::Fatal(ExecutionError::CommandFailed {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
    }

    if !command.is_send_file() {
        return Outcome::Success(stdout.to_string());
    }

    match parse_send_file_output(stdout) {
        None => Outcome::Fatal(ExecutionError::UnrecognizedResponse {
            stdout: stdout.to_string(),
        }),
        Some(SendFileOutcome::VendorError(code)) => Outcome::Fatal(ExecutionError::Vendor {
            code,
            stdout: stdout.to_string(),
        }),
        Some(SendFileOutcome::Processed(processed)) => {
            let expected = expected_lines.unwrap_or(0) as u64;
            if processed == 0 && expected > 0 {
                Outcome::Transient(stdout.to_string())
            } else if processed >= expected {
                // Some builds acknowledge bookkeeping lines on top of
                // the file's commands, so >= rather than ==
                Outcome::Success(stdout.to_string())
            } else {
                Outcome::Fatal(ExecutionError::Partial {
                    processed,
                    expected,
                    stdout: stdout.to_string(),
                })
            }
        }
    }
}
