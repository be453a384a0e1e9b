//! Gate Error Types
//!
//! This module provides gate-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Validation failures (wrong PIN, stale token, missing session) are not
//! errors: they are page-level outcomes handled by the use cases. The
//! variants here are genuine faults.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Backing store file could not be written
    #[error("Store write failed: {0}")]
    Storage(#[from] std::io::Error),

    /// Persisted document could not be encoded
    #[error("Store encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Unbind was called for a session holding no binding. Callers check
    /// validity before unbinding, so reaching this means a concurrent
    /// request removed the binding first.
    #[error("No binding for session")]
    BindingNotFound,
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Storage(_) | GateError::Encode(_) | GateError::BindingNotFound => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::Storage(_) | GateError::Encode(_) | GateError::BindingNotFound => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GateError::Storage(e) => {
                tracing::error!(error = %e, "Gate store write error");
            }
            GateError::Encode(e) => {
                tracing::error!(error = %e, "Gate store encode error");
            }
            GateError::BindingNotFound => {
                tracing::error!("Unbind of a session with no binding");
            }
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Return empty body for security (don't leak details)
        (status, ()).into_response()
    }
}
