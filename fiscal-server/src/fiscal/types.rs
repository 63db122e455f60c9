//! Request and response DTOs for the fiscal endpoints
//!
//! Request field names match the JSON the POS frontends already send;
//! response field names match what they already parse. Both stay in
//! Spanish on the wire.

use serde::{Deserialize, Serialize};

use fiscal_protocol::{Invoice, PrinterStatus};

/// Body of `POST /imprimir-factura-fiscal`
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceRequest {
    /// Terminal identifier, resolved to a directory under the base path
    #[serde(rename = "terminalUUID")]
    pub terminal_uuid: String,
    /// Invoice payload, flattened alongside the terminal field
    #[serde(flatten)]
    pub invoice: Invoice,
}

/// Body of `POST /imprimir-reporte-fiscal`
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "terminalUUID")]
    pub terminal_uuid: String,
    /// Report kind: `"X"` (reading) or `"Z"` (closure)
    pub tipo: String,
}

/// Successful print/report/test payload
#[derive(Debug, Clone, Serialize)]
pub struct PrintOutcome {
    pub mensaje: String,
    /// Raw executable output, kept verbatim for operator diagnosis
    pub respuesta_impresora: String,
}

/// Payload of `GET /estado-impresora-fiscal/{terminal_uuid}`
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status_code: u32,
    pub status_descripcion: &'static str,
    pub error_code: u32,
    pub error_descripcion: &'static str,
}

impl From<PrinterStatus> for StatusReport {
    fn from(status: PrinterStatus) -> Self {
        Self {
            status_code: status.status_code,
            status_descripcion: status.status_description(),
            error_code: status.error_code,
            error_descripcion: status.error_description(),
        }
    }
}
