//! Request-level error taxonomy.
//!
//! # Responsibilities
//! - Map every rejection to a deterministic HTTP status
//! - Convert errors into plain-text responses at the handler boundary
//!
//! # Design Decisions
//! - Security and validation failures are resolved locally (no backend call)
//! - Upstream failures surface as 5xx and are never retried
//! - No error is swallowed; each one produces a status and a log record

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Everything that can terminate a request before or instead of a
/// successful response.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// Path hit a security rule (dotfile segment, denied pattern, or a
    /// restricted prefix without an allow-listed entry script).
    #[error("access denied")]
    SecurityDenied,

    /// Static lookup missed under the document root.
    #[error("not found")]
    NotFound,

    /// Invalid percent-encoding, NUL byte, or a traversal segment.
    #[error("malformed request path: {0}")]
    MalformedRequest(String),

    /// Declared or observed body size exceeds the configured cap.
    #[error("request body too large")]
    PayloadTooLarge,

    /// Backend did not answer within the configured timeout.
    #[error("upstream timed out")]
    UpstreamTimeout,

    /// Backend refused the connection or produced a malformed response.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl EdgeError {
    /// The status this error resolves to.
    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::SecurityDenied => StatusCode::FORBIDDEN,
            EdgeError::NotFound => StatusCode::NOT_FOUND,
            EdgeError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            EdgeError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            EdgeError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            EdgeError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EdgeError::SecurityDenied => "security_denied",
            EdgeError::NotFound => "not_found",
            EdgeError::MalformedRequest(_) => "malformed_request",
            EdgeError::PayloadTooLarge => "payload_too_large",
            EdgeError::UpstreamTimeout => "upstream_timeout",
            EdgeError::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let body = match &self {
            EdgeError::SecurityDenied => "Forbidden".to_string(),
            EdgeError::NotFound => "Not Found".to_string(),
            EdgeError::MalformedRequest(_) => "Bad Request".to_string(),
            EdgeError::PayloadTooLarge => "Payload Too Large".to_string(),
            EdgeError::UpstreamTimeout => "Upstream request timed out".to_string(),
            EdgeError::UpstreamUnavailable(_) => "Upstream request failed".to_string(),
        };
        (self.status(), body).into_response()
    }
}
