//! Outbound HTTP to the price API.
//!
//! [`HttpTransport`] is the raw capability (one GET, no interpretation).
//! [`UpstreamClient`] sits on top of it and turns every transport or status
//! failure into an [`ApiError`] so callers branch on a `Result` instead of
//! inspecting reqwest errors.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::messages;

/// Raw response from a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure before a usable response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timeout: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

pub type QueryParams = [(&'static str, String)];

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport used in production.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    api_key: Option<String>,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, api_key: Option<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError> {
        let mut request = self
            .client
            .get(url)
            .header("accept", "application/json")
            .query(query);

        if let Some(key) = &self.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    RateLimited,
    NotFound,
    ServerError,
    NetworkError,
}

/// Classified upstream failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub code: StatusCode,
    pub details: Option<Value>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: &str, code: StatusCode, details: Option<Value>) -> Self {
        Self {
            kind,
            message: message.to_string(),
            code,
            details,
        }
    }

    /// Map a non-2xx upstream status onto the taxonomy.
    pub fn from_status(status: u16) -> Self {
        let details = Some(json!({ "status": status }));
        match status {
            400 => Self::new(ApiErrorKind::BadRequest, messages::API_BAD_REQUEST, StatusCode::BAD_REQUEST, details),
            403 => Self::new(ApiErrorKind::RateLimited, messages::API_RATE_LIMITED, StatusCode::FORBIDDEN, details),
            404 => Self::new(ApiErrorKind::NotFound, messages::API_NOT_FOUND, StatusCode::NOT_FOUND, details),
            429 => Self::new(ApiErrorKind::RateLimited, messages::API_RATE_LIMITED, StatusCode::TOO_MANY_REQUESTS, details),
            _ => Self::new(
                ApiErrorKind::ServerError,
                messages::API_SERVER_ERROR,
                StatusCode::INTERNAL_SERVER_ERROR,
                details,
            ),
        }
    }

    /// No response at all: DNS, refused connection, timeout.
    pub fn network() -> Self {
        Self::new(
            ApiErrorKind::NetworkError,
            messages::API_NETWORK_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
            None,
        )
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<dyn HttpTransport>,
}

impl UpstreamClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Single GET, no retry. A 2xx body is returned as JSON; an empty body is
    /// `null` and a body that is not JSON comes back as a JSON string so the
    /// caller's typed parse decides what to do with it.
    pub async fn fetch(&self, url: &str, params: &QueryParams) -> ApiResponse<Value> {
        let response = match self.transport.get(url, params).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Price API unreachable");
                return Err(ApiError::network());
            }
        };

        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "Price API returned error status");
            return Err(ApiError::from_status(response.status));
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
    }
}
