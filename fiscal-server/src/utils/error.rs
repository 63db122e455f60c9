//! Unified error handling
//!
//! Application-level error type and the response envelope every
//! endpoint answers with:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | E0000 | Success |
//! | E0002 | Request validation failed (400) |
//! | E5001 | Fiscal printer operation failed (500) |
//! | E9001 | Internal server error (500) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::fiscal::FiscalError;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request rejected before touching the printer (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Fiscal operation failed on a valid request (500). The message
    /// carries the terminal and the raw printer diagnosis; cashiers
    /// see it verbatim.
    #[error("Fiscal operation failed: {0}")]
    Fiscal(String),

    /// Unexpected server-side failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a fiscal pipeline error, tagging it with the terminal it
    /// happened on. Request-caused failures become `Validation`.
    pub fn from_fiscal(terminal: &str, err: FiscalError) -> Self {
        if err.is_validation() {
            AppError::Validation(err.to_string())
        } else {
            AppError::Fiscal(format!("[{terminal}] {err}"))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),

            AppError::Fiscal(msg) => {
                error!(target: "fiscal", error = %msg, "Fiscal operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "E5001", msg.clone())
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
