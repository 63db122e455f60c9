//! HTTP surface
//!
//! Routes are registered in [`build_router`]; [`build_app`] adds the
//! middleware stack and the state.

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod fiscal;
pub mod health;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Fiscal API - the printing endpoints
        .merge(fiscal::router())
        // Health API - public probe
        .merge(health::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - POS frontends are served from other origins
        .layer(CorsLayer::permissive())
        // Trace - request spans at INFO level
        .layer(TraceLayer::new_for_http())
        // Request ID - unique ID per request, echoed in the response.
        // `layer` wraps outside-in, so the set layer must be added
        // last to run before the propagate layer sees the request.
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, XRequestId))
        .with_state(state)
}
