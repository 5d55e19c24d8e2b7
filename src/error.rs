//! Application error taxonomy.
//!
//! [`AppError`] is the only error shape that leaves a service boundary. Lower
//! layers keep their own error enums and convert at the edge, so handlers can
//! render any failure without looking at where it came from.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::constants::messages;
use crate::models::price::ErrorResponse;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    pub message: String,
    pub status_code: StatusCode,
    pub details: Option<Value>,
}

impl AppError {
    pub fn new(message: impl Into<String>, status_code: StatusCode, details: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status_code,
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST, Some(details))
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::new(message, StatusCode::NOT_FOUND, Some(details))
    }

    /// Wrap an unexpected failure. The original message is kept in
    /// `details.originalError` for logs; the caller only sees the fixed message.
    pub fn internal(original: impl std::fmt::Display) -> Self {
        Self::new(
            messages::SERVER_INTERNAL,
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(json!({ "originalError": original.to_string() })),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.status_code.is_server_error() && self.status_code != StatusCode::SERVICE_UNAVAILABLE
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = if self.is_internal() {
            tracing::error!(
                status = self.status_code.as_u16(),
                details = ?self.details,
                "{}",
                self.message
            );
            None
        } else {
            self.details
        };

        let body = ErrorResponse {
            message: self.message,
            details,
        };

        (self.status_code, Json(body)).into_response()
    }
}
