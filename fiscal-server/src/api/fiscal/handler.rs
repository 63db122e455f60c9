//! Fiscal endpoint handlers
//!
//! Thin layer: parse, delegate to
//! [`FiscalService`](crate::fiscal::FiscalService), wrap in the
//! response envelope. All printing policy lives in the service.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::core::ServerState;
use crate::fiscal::service::ReportKind;
use crate::fiscal::types::{InvoiceRequest, PrintOutcome, ReportRequest, StatusReport};
use crate::utils::error::{AppError, AppResponse, ok, ok_with_message};
use crate::utils::result::AppResult;

/// `POST /imprimir-factura-fiscal`
///
/// Prints a fiscal invoice on the requested terminal. Requests for
/// the same terminal are serialized; the call returns once the
/// printer has acknowledged every command.
#[instrument(skip(state, request), fields(terminal = %request.terminal_uuid))]
pub async fn print_invoice(
    State(state): State<ServerState>,
    Json(request): Json<InvoiceRequest>,
) -> AppResult<Json<AppResponse<PrintOutcome>>> {
    let response = state
        .fiscal
        .print_invoice(&request.terminal_uuid, &request.invoice)
        .await
        .map_err(|e| AppError::from_fiscal(&request.terminal_uuid, e))?;

    Ok(ok(PrintOutcome {
        mensaje: "Factura fiscal impresa correctamente.".to_string(),
        respuesta_impresora: response,
    }))
}

/// `POST /imprimir-reporte-fiscal`
///
/// Prints an X (reading) or Z (daily closure) report.
#[instrument(skip(state, request), fields(terminal = %request.terminal_uuid, tipo = %request.tipo))]
pub async fn print_report(
    State(state): State<ServerState>,
    Json(request): Json<ReportRequest>,
) -> AppResult<Json<AppResponse<PrintOutcome>>> {
    let kind = ReportKind::parse(&request.tipo).ok_or_else(|| {
        AppError::Validation(format!(
            "tipo must be 'X' or 'Z', got {:?}",
            request.tipo
        ))
    })?;

    let response = state
        .fiscal
        .print_report(&request.terminal_uuid, kind)
        .await
        .map_err(|e| AppError::from_fiscal(&request.terminal_uuid, e))?;

    Ok(ok(PrintOutcome {
        mensaje: format!("Reporte {} impreso correctamente.", request.tipo.trim().to_uppercase()),
        respuesta_impresora: response,
    }))
}

/// `GET /estado-impresora-fiscal/{terminal_uuid}`
///
/// Reads printer status and error codes with their manual
/// descriptions.
#[instrument(skip(state))]
pub async fn printer_status(
    State(state): State<ServerState>,
    Path(terminal_uuid): Path<String>,
) -> AppResult<Json<AppResponse<StatusReport>>> {
    let status = state
        .fiscal
        .read_status(&terminal_uuid)
        .await
        .map_err(|e| AppError::from_fiscal(&terminal_uuid, e))?;

    Ok(ok(StatusReport::from(status)))
}

/// `POST /test-fiscal/{terminal_uuid}`
///
/// Connectivity probe; sends one harmless display command.
#[instrument(skip(state))]
pub async fn test_connection(
    State(state): State<ServerState>,
    Path(terminal_uuid): Path<String>,
) -> AppResult<Json<AppResponse<PrintOutcome>>> {
    let response = state
        .fiscal
        .test_connection(&terminal_uuid)
        .await
        .map_err(|e| AppError::from_fiscal(&terminal_uuid, e))?;

    Ok(ok_with_message(
        PrintOutcome {
            mensaje: "Conexión con la impresora fiscal verificada.".to_string(),
            respuesta_impresora: response,
        },
        "Printer reachable",
    ))
}
