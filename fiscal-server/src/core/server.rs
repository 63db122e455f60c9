use anyhow::Context;
use tracing::info;

use crate::api;
use crate::core::{Config, ServerState};

/// HTTP server lifecycle
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            state: ServerState::initialize(config),
        }
    }

    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    /// Bind and serve until ctrl-c.
    pub async fn run(self) -> anyhow::Result<()> {
        let port = self.state.config.http_port;
        let app = api::build_app(self.state);

        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("could not bind HTTP port {port}"))?;
        info!(port, "fiscal print server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server terminated abnormally")?;

        info!("fiscal print server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not install ctrl-c handler");
    }
}
