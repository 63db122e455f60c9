use std::path::PathBuf;
use std::sync::Arc;

use crate::core::Config;
use crate::fiscal::executor::FiscalExecutor;
use crate::fiscal::runner::{CommandRunner, ProcessRunner};
use crate::fiscal::service::FiscalService;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub fiscal: Arc<FiscalService>,
    /// Set at construction; `/health` reports uptime against it
    pub started_at: tokio::time::Instant,
}

impl ServerState {
    /// Wire up the production state: a real subprocess runner behind
    /// the executor.
    pub fn initialize(config: Config) -> Self {
        let runner = Arc::new(ProcessRunner::new(config.invocation, config.process_timeout));
        Self::with_runner(config, runner)
    }

    /// Same wiring with an injected runner, for tests.
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        let executor = FiscalExecutor::new(
            runner,
            config.executable.clone(),
            config.retry_policy(),
        );
        let fiscal = Arc::new(FiscalService::new(
            PathBuf::from(&config.base_path),
            executor,
            config.encoder_config(),
            config.write_verify_timeout,
            config.write_poll_interval,
        ));

        Self {
            config: Arc::new(config),
            fiscal,
            started_at: tokio::time::Instant::now(),
        }
    }
}
