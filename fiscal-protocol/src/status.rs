//! Printer status and error code tables
//!
//! `ReadFpStatus` leaves a one-line report containing a status code
//! and an error code. Descriptions below come from the TFHKA manual
//! and stay in Spanish, as they are shown verbatim to cashiers.

use crate::error::{ProtocolError, ProtocolResult};

/// Parsed result of a `ReadFpStatus` report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterStatus {
    pub status_code: u32,
    pub error_code: u32,
}

impl PrinterStatus {
    pub fn status_description(&self) -> &'static str {
        describe_status_code(self.status_code)
    }

    pub fn error_description(&self) -> &'static str {
        describe_error_code(self.error_code)
    }
}

/// Describe a printer status code; unknown codes get a generic text
/// instead of failing.
pub fn describe_status_code(code: u32) -> &'static str {
    match code {
        4 => "En modo fiscal y en espera.",
        5 => "En modo fiscal y emisión de documentos fiscales.",
        6 => "En modo fiscal y emisión de documentos no fiscales.",
        _ => "Código de estado no documentado.",
    }
}

/// Describe a printer error code; unknown codes get a generic text
/// instead of failing.
pub fn describe_error_code(code: u32) -> &'static str {
    match code {
        0 => "No hay error.",
        1 => "Fin en la entrega de papel.",
        2 => "Error de índole mecánico en la entrega de papel.",
        100 => "Error de la memoria fiscal.",
        108 => "Memoria fiscal llena.",
        128 => "Error en la comunicación.",
        137 => "No hay respuesta.",
        _ => "Código de error no documentado.",
    }
}

/// Parse a status report line.
///
/// The executable's formatting varies (`Status: 04 Error: 00`,
/// `Status 4  Error 0`, …), so this scans for the `Status` and `Error`
/// tokens and takes the integer that follows each, colons ignored.
pub fn parse_status_line(line: &str) -> ProtocolResult<PrinterStatus> {
    let malformed = || ProtocolError::MalformedStatusLine(line.to_string());

    let normalized = line.replace(':', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let value_after = |name: &str| -> Option<u32> {
        let pos = tokens.iter().position(|t| *t == name)?;
        tokens.get(pos + 1)?.parse().ok()
    };

    Ok(PrinterStatus {
        status_code: value_after("Status").ok_or_else(malformed)?,
        error_code: value_after("Error").ok_or_else(malformed)?,
    })
}
