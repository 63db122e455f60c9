//! Shared test fixtures
//!
//! A recording in-process stand-in for the vendor executable, plus
//! helpers to stand up a server state over a temporary terminal tree.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use fiscal_server::core::{Config, ServerState};
use fiscal_server::fiscal::runner::{CommandRunner, FiscalCommand, ProcessOutput, RunnerError};

/// One recorded invocation with its wall-clock window
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub work_dir: PathBuf,
    pub command: String,
    pub started: Instant,
    pub finished: Instant,
}

/// Runner that emulates the vendor executable: counts command-file
/// lines, drops status report files, and records every invocation.
pub struct RecordingRunner {
    /// Simulated execution time per invocation
    pub delay: Duration,
    /// Status line the fake `ReadFpStatus` writes
    pub status_line: String,
    /// When set, every `SendFileCmd` answers with this stdout instead
    /// of the computed line count
    pub send_file_stdout: Option<String>,
    pub calls: Mutex<Vec<CallRecord>>,
}

impl RecordingRunner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            status_line: "Status: 04 Error: 00".to_string(),
            send_file_stdout: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        _program: &Path,
        command: &FiscalCommand,
        work_dir: &Path,
    ) -> Result<ProcessOutput, RunnerError> {
        let started = Instant::now();
        tokio::time::sleep(self.delay).await;

        let stdout = match command {
            FiscalCommand::SendFile(path) => match &self.send_file_stdout {
                Some(fixed) => fixed.clone(),
                None => {
                    let lines = std::fs::read_to_string(work_dir.join(path))
                        .map(|c| c.lines().count())
                        .unwrap_or(0);
                    format!("Enviados {lines} comandos")
                }
            },
            FiscalCommand::Send(_) => "Comando enviado correctamente".to_string(),
            FiscalCommand::ReadStatus(path) => {
                std::fs::write(work_dir.join(path), &self.status_line)?;
                "Operacion exitosa".to_string()
            }
        };

        self.calls.lock().unwrap().push(CallRecord {
            work_dir: work_dir.to_path_buf(),
            command: command.name().to_string(),
            started,
            finished: Instant::now(),
        });

        Ok(ProcessOutput {
            exit_ok: true,
            stdout,
            stderr: String::new(),
        })
    }
}

/// Server state over a fresh terminal tree; keep the tempdir alive for
/// the test's duration.
pub fn test_state(
    terminals: &[&str],
    runner: Arc<RecordingRunner>,
) -> (ServerState, tempfile::TempDir) {
    let base = tempfile::tempdir().unwrap();
    for terminal in terminals {
        std::fs::create_dir(base.path().join(terminal)).unwrap();
    }

    let config = Config::with_overrides(base.path().to_string_lossy(), 0);
    (ServerState::with_runner(config, runner), base)
}

/// Sample invoice body accepted by `POST /imprimir-factura-fiscal`
pub fn invoice_body(terminal: &str) -> serde_json::Value {
    serde_json::json!({
        "terminalUUID": terminal,
        "cliente": {"razon_social": "Consumidor Final", "rif": "V000000000"},
        "items": [{
            "descripcion": "Arepa Reina",
            "cantidad": 2,
            "precio_unitario_con_iva": 11.60,
            "tasa_iva": 16
        }],
        "pagos": [{"slot_fiscal": 1, "monto": 23.20}]
    })
}
