use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// Only `MissingIdentity` and `Internal` can be produced while serving a
/// request. The remaining variants are startup failures that `main` maps to
/// process exit codes.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Identity header '{header}' is missing from the request")]
    MissingIdentity { header: String },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Error response body for failed requests.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl AppError {
    /// Stable machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingIdentity { .. } => "missing_identity",
            AppError::Internal(_) => "internal_error",
            AppError::ConfigError(_) => "config_error",
            AppError::Bind { .. } | AppError::Server(_) => "server_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full error details server-side for debugging
        // but only expose sanitized messages to clients
        tracing::error!(error = %self, "Request failed");

        let message = match &self {
            // The expected header name is operator configuration, not
            // internal state, and is what a proxy author needs to see.
            AppError::MissingIdentity { header } => format!(
                "No authenticated identity was forwarded: expected the '{header}' header to be set by the authorization proxy"
            ),
            AppError::ConfigError(_) => "Service configuration error.".to_string(),
            AppError::Internal(_) | AppError::Bind { .. } | AppError::Server(_) => {
                "An internal error occurred.".to_string()
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message,
        };

        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
