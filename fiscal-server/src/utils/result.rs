use crate::utils::error::AppError;

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;
