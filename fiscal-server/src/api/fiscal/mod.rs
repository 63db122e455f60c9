use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub mod handler;

/// Fiscal printing routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/imprimir-factura-fiscal", post(handler::print_invoice))
        .route("/imprimir-reporte-fiscal", post(handler::print_report))
        .route(
            "/estado-impresora-fiscal/{terminal_uuid}",
            get(handler::printer_status),
        )
        .route("/test-fiscal/{terminal_uuid}", post(handler::test_connection))
}
