//! Error types for the data layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Data Error Enum ==
/// Unified error type for the data layer and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Backend could not be reached (offline, I/O failure)
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend was reached but rejected the operation or returned bad data
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Lookup by identifier found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (e.g. the write queue worker is gone)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let status = match &self {
            DataError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DataError::BackendError(_) => StatusCode::BAD_GATEWAY,
            DataError::NotFound(_) => StatusCode::NOT_FOUND,
            DataError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DataError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the data layer.
pub type Result<T> = std::result::Result<T, DataError>;
