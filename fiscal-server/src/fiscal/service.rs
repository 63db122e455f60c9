//! Fiscal operation orchestration
//!
//! One public entry per endpoint. Every operation resolves the
//! terminal directory first; printing operations then take the
//! terminal's lock for their whole critical section (encode result
//! write through executable verdict), so concurrent requests for one
//! terminal are strictly serialized while distinct terminals proceed
//! in parallel.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use fiscal_protocol::{
    EncoderConfig, Invoice, PrinterStatus, encode_invoice, encode_latin1, parse_status_line,
};

use crate::fiscal::executor::FiscalExecutor;
use crate::fiscal::locks::TerminalLocks;
use crate::fiscal::runner::FiscalCommand;
use crate::fiscal::terminal::resolve_terminal_dir;
use crate::fiscal::writer::write_and_verify;
use crate::fiscal::{FiscalError, FiscalResult};

/// Fixed name of the per-terminal command file
const COMMAND_FILE: &str = "factura_actual.txt";

/// Fiscal report kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// X report: reading, does not close the fiscal day
    X,
    /// Z report: daily closure
    Z,
}

impl ReportKind {
    /// Parse the `tipo` request field, case-insensitively.
    pub fn parse(tipo: &str) -> Option<Self> {
        match tipo.trim() {
            "X" | "x" => Some(ReportKind::X),
            "Z" | "z" => Some(ReportKind::Z),
            _ => None,
        }
    }

    /// Direct printer command for this report
    pub fn command(&self) -> &'static str {
        match self {
            ReportKind::X => "I0X",
            ReportKind::Z => "I0Z",
        }
    }
}

/// Orchestrates fiscal operations against terminal directories
pub struct FiscalService {
    base_path: PathBuf,
    executor: FiscalExecutor,
    locks: TerminalLocks,
    encoder_config: EncoderConfig,
    write_timeout: Duration,
    write_poll: Duration,
}

impl FiscalService {
    pub fn new(
        base_path: PathBuf,
        executor: FiscalExecutor,
        encoder_config: EncoderConfig,
        write_timeout: Duration,
        write_poll: Duration,
    ) -> Self {
        Self {
            base_path,
            executor,
            locks: TerminalLocks::new(),
            encoder_config,
            write_timeout,
            write_poll,
        }
    }

    /// Encode, persist and print an invoice on one terminal.
    ///
    /// Returns the raw executable response on success.
    #[instrument(skip(self, invoice), fields(terminal = %terminal))]
    pub async fn print_invoice(&self, terminal: &str, invoice: &Invoice) -> FiscalResult<String> {
        let dir = resolve_terminal_dir(&self.base_path, terminal)?;

        // The lock covers encode through executable verdict, so the
        // command file can never be overwritten mid-transaction.
        let handle = self.locks.handle(terminal);
        let _guard = handle.lock().await;

        let commands = encode_invoice(invoice, &self.encoder_config)?;
        let content = encode_latin1(&commands.join("\n"));

        info!(lines = commands.len(), "printing fiscal invoice");
        write_and_verify(
            &dir.join(COMMAND_FILE),
            &content,
            self.write_timeout,
            self.write_poll,
        )
        .await?;

        let response = self
            .executor
            .execute(
                &FiscalCommand::SendFile(PathBuf::from(COMMAND_FILE)),
                &dir,
                Some(commands.len()),
            )
            .await?;
        Ok(response)
    }

    /// Print an X or Z report.
    #[instrument(skip(self), fields(terminal = %terminal, kind = ?kind))]
    pub async fn print_report(&self, terminal: &str, kind: ReportKind) -> FiscalResult<String> {
        let dir = resolve_terminal_dir(&self.base_path, terminal)?;

        // Reports share the lock with invoices: a Z closure landing in
        // the middle of an invoice corrupts the fiscal day.
        let handle = self.locks.handle(terminal);
        let _guard = handle.lock().await;

        info!("printing fiscal report");
        let response = self
            .executor
            .execute(
                &FiscalCommand::Send(kind.command().to_string()),
                &dir,
                None,
            )
            .await?;
        Ok(response)
    }

    /// Query printer status and error codes.
    ///
    /// Read-only for the printer, so it skips the terminal lock and
    /// works even while a print is in flight.
    #[instrument(skip(self), fields(terminal = %terminal))]
    pub async fn read_status(&self, terminal: &str) -> FiscalResult<PrinterStatus> {
        let dir = resolve_terminal_dir(&self.base_path, terminal)?;

        // Unique name per request so concurrent status reads cannot
        // clobber each other's report file.
        let file_name = format!("estado_{}.txt", Uuid::new_v4().simple());
        let status_path = dir.join(&file_name);

        let outcome = self.read_status_inner(&dir, &file_name, &status_path).await;

        if let Err(e) = tokio::fs::remove_file(&status_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %status_path.display(), error = %e, "could not remove status file");
            }
        }
        outcome
    }

    async fn read_status_inner(
        &self,
        dir: &Path,
        file_name: &str,
        status_path: &Path,
    ) -> FiscalResult<PrinterStatus> {
        self.executor
            .execute(
                &FiscalCommand::ReadStatus(PathBuf::from(file_name)),
                dir,
                None,
            )
            .await?;

        let raw = tokio::fs::read(status_path).await?;
        let line = fiscal_protocol::decode_latin1(&raw);
        let status = parse_status_line(line.trim()).map_err(FiscalError::MalformedStatus)?;
        info!(
            status_code = status.status_code,
            error_code = status.error_code,
            "printer status read"
        );
        Ok(status)
    }

    /// Cheap connectivity probe: one direct `D` (display) command.
    #[instrument(skip(self), fields(terminal = %terminal))]
    pub async fn test_connection(&self, terminal: &str) -> FiscalResult<String> {
        let dir = resolve_terminal_dir(&self.base_path, terminal)?;
        let response = self
            .executor
            .execute(&FiscalCommand::Send("D".to_string()), &dir, None)
            .await?;
        Ok(response)
    }

    /// Lock registry, exposed for concurrency tests.
    pub fn locks(&self) -> &TerminalLocks {
        &self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::executor::RetryPolicy;
    use crate::fiscal::runner::{CommandRunner, ProcessOutput, RunnerError};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    /// Runner that answers every invocation with a fixed success and,
    /// for status reads, drops a report file where the real executable
    /// would.
    struct CannedRunner {
        status_line: Option<String>,
    }

    #[async_trait]
    impl CommandRunner for CannedRunner {
        async fn run(
            &self,
            _program: &Path,
            command: &FiscalCommand,
            work_dir: &Path,
        ) -> Result<ProcessOutput, RunnerError> {
            let stdout = match command {
                FiscalCommand::SendFile(path) => {
                    let lines = std::fs::read_to_string(work_dir.join(path))
                        .map(|c| c.lines().count())
                        .unwrap_or(0);
                    format!("Enviados {lines} comandos")
                }
                FiscalCommand::Send(_) => "Comando enviado correctamente".to_string(),
                FiscalCommand::ReadStatus(path) => {
                    if let Some(line) = &self.status_line {
                        std::fs::write(work_dir.join(path), line).unwrap();
                    }
                    "Operacion exitosa".to_string()
                }
            };
            Ok(ProcessOutput {
                exit_ok: true,
                stdout,
                stderr: String::new(),
            })
        }
    }

    fn service(base: &Path, status_line: Option<&str>) -> FiscalService {
        let runner = Arc::new(CannedRunner {
            status_line: status_line.map(str::to_string),
        });
        FiscalService::new(
            base.to_path_buf(),
            FiscalExecutor::new(runner, "tfinulx".to_string(), RetryPolicy::default()),
            EncoderConfig::default(),
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
    }

    fn sample_invoice() -> Invoice {
        serde_json::from_str(
            r#"{
                "items": [{"descripcion": "Arepa Reina", "cantidad": 2,
                           "precio_unitario_con_iva": 11.60, "tasa_iva": 16}],
                "pagos": [{"slot_fiscal": 1, "monto": 23.20}]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_invoice_writes_command_file_and_prints() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();

        let svc = service(base.path(), None);
        let response = svc.print_invoice("caja-1", &sample_invoice()).await.unwrap();
        assert!(response.starts_with("Enviados"));

        let written =
            std::fs::read_to_string(base.path().join("caja-1").join(COMMAND_FILE)).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "iS*Consumidor Final");
        assert_eq!(lines[1], "iR*V000000000");
        assert_eq!(*lines.last().unwrap(), "101");
    }

    #[tokio::test]
    async fn test_invoice_for_unknown_terminal_rejected_before_writing() {
        let base = tempfile::tempdir().unwrap();
        let svc = service(base.path(), None);

        let err = svc.print_invoice("caja-9", &sample_invoice()).await.unwrap_err();
        assert!(matches!(err, FiscalError::UnknownTerminal { .. }));
    }

    #[tokio::test]
    async fn test_invoice_with_overflowing_amount_rejected() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();

        let mut invoice = sample_invoice();
        invoice.items[0].precio_unitario_con_iva = Decimal::from(1_000_000_000i64);

        let svc = service(base.path(), None);
        let err = svc.print_invoice("caja-1", &invoice).await.unwrap_err();
        assert!(matches!(err, FiscalError::Encode(_)));
        // nothing was written
        assert!(!base.path().join("caja-1").join(COMMAND_FILE).exists());
    }

    #[tokio::test]
    async fn test_report_kinds() {
        assert_eq!(ReportKind::parse("X"), Some(ReportKind::X));
        assert_eq!(ReportKind::parse(" z "), Some(ReportKind::Z));
        assert_eq!(ReportKind::parse("W"), None);
        assert_eq!(ReportKind::Z.command(), "I0Z");

        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();
        let svc = service(base.path(), None);
        let response = svc.print_report("caja-1", ReportKind::Z).await.unwrap();
        assert!(response.contains("correctamente"));
    }

    #[tokio::test]
    async fn test_status_read_parses_and_cleans_up() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("caja-1");
        std::fs::create_dir(&dir).unwrap();

        let svc = service(base.path(), Some("Status: 04 Error: 00"));
        let status = svc.read_status("caja-1").await.unwrap();
        assert_eq!(status.status_code, 4);
        assert_eq!(status.error_code, 0);

        // the per-request report file must be gone
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("estado_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_status_file_removed_even_when_malformed() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("caja-1");
        std::fs::create_dir(&dir).unwrap();

        let svc = service(base.path(), Some("sin sentido"));
        let err = svc.read_status("caja-1").await.unwrap_err();
        assert!(matches!(err, FiscalError::MalformedStatus(_)));

        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("estado_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_connection_probe() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("caja-1")).unwrap();

        let svc = service(base.path(), None);
        let response = svc.test_connection("caja-1").await.unwrap();
        assert!(response.contains("correctamente"));
    }
}
