//! Error types for the markdown viewer
//!
//! Provides unified error handling using thiserror.
//!
//! Cache misses are deliberately not represented here: the render cache
//! reports absence as `Option::None` and never raises an error from any of
//! its operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the viewer application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Requested path escapes the served base directory
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid construction or startup parameters
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the viewer.
pub type Result<T> = std::result::Result<T, AppError>;
