// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Setup cannot proceed (bad credentials wiring, no usable redirect URL).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Token file exists but cannot be read or parsed.
    #[error("Token storage error: {0}")]
    Storage(String),

    /// No usable token at update time, or the code exchange was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Splitwise API error: {0}")]
    SplitwiseApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Token storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::AuthenticationFailed(msg) => (
                StatusCode::UNAUTHORIZED,
                "authentication_failed",
                Some(msg.clone()),
            ),
            AppError::SplitwiseApi(msg) => (
                StatusCode::BAD_GATEWAY,
                "splitwise_error",
                Some(msg.clone()),
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
