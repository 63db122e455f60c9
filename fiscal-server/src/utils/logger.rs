//! Logging infrastructure
//!
//! Structured logging for development (console) and production
//! (console plus daily rolling files when a log directory is set).

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger.
///
/// `level` is a tracing filter directive (`info`,
/// `fiscal_server=debug`, ...); `RUST_LOG` overrides it when set.
pub fn init_logger(level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "fiscal-server");
            subscriber.with_writer(file_appender).with_ansi(false).init();
            return;
        }
        eprintln!("LOG_DIR {dir} is not a directory, logging to console only");
    }

    subscriber.init();
}
