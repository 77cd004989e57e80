//! Backend request forwarding.
//!
//! # Responsibilities
//! - Build the backend request: normalized path + original query, method,
//!   headers, plus forwarding metadata (entry script, client address,
//!   request id)
//! - Enforce the body size cap before any byte reaches the backend
//! - Bound the exchange with the configured timeout
//! - Map backend failures to the error taxonomy without retrying
//!
//! # Design Decisions
//! - The request body is buffered up to the cap, so an oversized body
//!   fails with 413 before the backend sees it
//! - Response bodies stream back to the client; nothing is buffered
//! - Client disconnect drops the in-flight future, which cancels the
//!   backend call
//! - 5xx from the backend is relayed as-is; only transport failures
//!   become 502/504 here

use std::str::FromStr;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::schema::UpstreamConfig;
use crate::error::EdgeError;

/// Forwarding metadata header: the entry script resolved by routing.
pub const X_ENTRY_SCRIPT: &str = "x-entry-script";

/// Forwarding metadata header: the client address.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Failure modes of a backend exchange.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),

    #[error("backend connection failed: {0}")]
    Connect(String),

    #[error("request body exceeds limit of {0} bytes")]
    BodyTooLarge(usize),
}

impl UpstreamError {
    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Connect(_) => "connect",
            UpstreamError::BodyTooLarge(_) => "body_too_large",
        }
    }
}

impl From<UpstreamError> for EdgeError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Timeout(_) => EdgeError::UpstreamTimeout,
            UpstreamError::Connect(msg) => EdgeError::UpstreamUnavailable(msg),
            UpstreamError::BodyTooLarge(_) => EdgeError::PayloadTooLarge,
        }
    }
}

/// Forwards dynamic requests to the application backend.
pub struct Dispatcher {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    timeout: Duration,
    max_body_bytes: usize,
}

impl Dispatcher {
    /// Build a dispatcher for the configured backend.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, axum::http::uri::InvalidUri> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self {
            client,
            authority: Authority::from_str(&config.address)?,
            timeout: Duration::from_secs(config.timeout_secs),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Forward a request through the given entry script and relay the
    /// backend response. `path` is the normalized path; the original
    /// query string is carried over untouched.
    pub async fn dispatch(
        &self,
        request: Request<Body>,
        path: &str,
        entry_script: &str,
        client_addr: &str,
        request_id: &str,
    ) -> Result<Response<Body>, UpstreamError> {
        // Declared-size fail-fast before reading anything.
        if let Some(declared) = content_length(&request) {
            if declared > self.max_body_bytes as u64 {
                return Err(UpstreamError::BodyTooLarge(self.max_body_bytes));
            }
        }

        let (parts, body) = request.into_parts();

        // Buffer up to the cap; an over-limit body fails here, before
        // the backend sees a byte.
        let body_bytes = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|_| UpstreamError::BodyTooLarge(self.max_body_bytes))?;

        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };
        let path_and_query = PathAndQuery::from_str(&path_and_query)
            .map_err(|e| UpstreamError::Connect(format!("invalid backend path: {e}")))?;
        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| UpstreamError::Connect(format!("invalid backend uri: {e}")))?;

        let mut headers = parts.headers;
        headers.insert(
            X_ENTRY_SCRIPT,
            HeaderValue::from_str(entry_script)
                .unwrap_or_else(|_| HeaderValue::from_static("index.php")),
        );
        if let Ok(value) = HeaderValue::from_str(client_addr) {
            headers.insert(X_FORWARDED_FOR, value);
        }
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert("x-request-id", value);
        }
        // Hop-by-hop; the backend sees a fresh connection.
        headers.remove(header::CONNECTION);

        let mut req = Request::builder()
            .method(parts.method)
            .uri(uri)
            .version(parts.version);
        if let Some(h) = req.headers_mut() {
            *h = headers;
        }
        let req = req
            .body(Body::from(body_bytes))
            .map_err(|e| UpstreamError::Connect(format!("request build failed: {e}")))?;

        match tokio::time::timeout(self.timeout, self.client.request(req)).await {
            Ok(Ok(response)) => {
                let (parts, body) = response.into_parts();
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Ok(Err(e)) => Err(UpstreamError::Connect(e.to_string())),
            Err(_) => Err(UpstreamError::Timeout(self.timeout)),
        }
    }
}

fn content_length(request: &Request<Body>) -> Option<u64> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
