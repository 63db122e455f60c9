//! Health probe
//!
//! Public route, no printer interaction. Deployment tooling polls it
//! to tell "server down" apart from "printer failing".

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    uptime_seconds: u64,
    /// Terminals that have printed since startup
    terminals_seen: usize,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        terminals_seen: state.fiscal.locks().len(),
    })
}
