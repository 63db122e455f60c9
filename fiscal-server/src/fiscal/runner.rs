//! Fiscal executable invocation
//!
//! The vendor ships the same tool with two incompatible command-line
//! conventions:
//!
//! ```text
//! IntTFHKA "SendFileCmd(factura_actual.txt)"     (Windows builds)
//! tfinulx SendFileCmd factura_actual.txt         (Linux builds)
//! ```
//!
//! [`InvocationStyle`] captures the difference once, selected at
//! startup. [`CommandRunner`] is the seam the executor talks through;
//! tests inject scripted runners instead of spawning processes.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

use fiscal_protocol::decode_latin1;

/// A logical command for the fiscal executable
#[derive(Debug, Clone)]
pub enum FiscalCommand {
    /// `SendFileCmd` - feed a command file to the printer
    SendFile(PathBuf),
    /// `SendCmd` - a single direct command (reports, diagnostics)
    Send(String),
    /// `ReadFpStatus` - dump printer status into the given file
    ReadStatus(PathBuf),
}

impl FiscalCommand {
    pub fn name(&self) -> &'static str {
        match self {
            FiscalCommand::SendFile(_) => "SendFileCmd",
            FiscalCommand::Send(_) => "SendCmd",
            FiscalCommand::ReadStatus(_) => "ReadFpStatus",
        }
    }

    pub fn argument(&self) -> String {
        match self {
            FiscalCommand::SendFile(path) | FiscalCommand::ReadStatus(path) => {
                path.display().to_string()
            }
            FiscalCommand::Send(cmd) => cmd.clone(),
        }
    }

    pub fn is_send_file(&self) -> bool {
        matches!(self, FiscalCommand::SendFile(_))
    }
}

/// Argument convention of the installed executable build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStyle {
    /// Single argument `Name(argument)`
    Parenthesized,
    /// Separate argv entries `Name argument`
    SeparateArgs,
}

impl InvocationStyle {
    /// Default convention for the host platform
    pub fn for_host() -> Self {
        if cfg!(windows) {
            InvocationStyle::Parenthesized
        } else {
            InvocationStyle::SeparateArgs
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parenthesized" => Some(InvocationStyle::Parenthesized),
            "argv" => Some(InvocationStyle::SeparateArgs),
            _ => None,
        }
    }

    /// Build the argv tail for a command
    pub fn args(&self, command: &FiscalCommand) -> Vec<String> {
        match self {
            InvocationStyle::Parenthesized => {
                vec![format!("{}({})", command.name(), command.argument())]
            }
            InvocationStyle::SeparateArgs => {
                vec![command.name().to_string(), command.argument()]
            }
        }
    }
}

/// Captured result of one invocation
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit status was zero
    pub exit_ok: bool,
    /// stdout, latin-1 decoded and trimmed
    pub stdout: String,
    /// stderr, latin-1 decoded and trimmed
    pub stderr: String,
}

/// Invocation-level failures (before any output classification)
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("fiscal executable not found at {0}")]
    NotInstalled(PathBuf),

    #[error("fiscal executable gave no response within {0:?}")]
    NoResponse(Duration),

    #[error("failed to launch fiscal executable: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam between the executor and the operating system
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` in `work_dir` and capture its output.
    async fn run(
        &self,
        program: &Path,
        command: &FiscalCommand,
        work_dir: &Path,
    ) -> Result<ProcessOutput, RunnerError>;
}

/// Production runner: spawns the vendor executable
pub struct ProcessRunner {
    style: InvocationStyle,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(style: InvocationStyle, timeout: Duration) -> Self {
        Self { style, timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[instrument(skip(self), fields(command = command.name(), dir = %work_dir.display()))]
    async fn run(
        &self,
        program: &Path,
        command: &FiscalCommand,
        work_dir: &Path,
    ) -> Result<ProcessOutput, RunnerError> {
        let args = self.style.args(command);
        debug!(program = %program.display(), ?args, "invoking fiscal executable");

        let child = tokio::process::Command::new(program)
            .args(&args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RunnerError::NotInstalled(program.to_path_buf())
                } else {
                    RunnerError::Io(e)
                }
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RunnerError::NoResponse(self.timeout))??;

        Ok(ProcessOutput {
            exit_ok: output.status.success(),
            stdout: decode_latin1(&output.stdout).trim().to_string(),
            stderr: decode_latin1(&output.stderr).trim().to_string(),
        })
    }
}
