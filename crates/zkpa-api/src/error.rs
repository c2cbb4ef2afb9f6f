//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps attestation errors to HTTP status codes: malformed uploads are the
//! caller's fault (4xx), key-material failures are the operator's (5xx).
//! Server-side messages are logged and never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkpa_core::AttestError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "MISSING_FIELD", "DECODE_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required multipart field was absent (400).
    #[error("missing multipart field: {0}")]
    MissingField(&'static str),

    /// The request body is not a readable multipart form (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A pipeline stage failed.
    #[error(transparent)]
    Attest(#[from] AttestError),

    /// The service cannot currently attest (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Attest(e) if e.is_input_error() => (StatusCode::UNPROCESSABLE_ENTITY, e.code()),
            Self::Attest(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.code()),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::MissingField(field) => Some(serde_json::json!({ "field": field })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
            match &self {
                Self::ServiceUnavailable(_) => "The service is not ready".to_string(),
                _ => "An internal error occurred".to_string(),
            }
        } else {
            tracing::debug!(error = %self, code, "request rejected");
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}
