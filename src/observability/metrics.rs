//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method, status, action
//! - `edge_request_duration_seconds` (histogram): latency by method,
//!   status, action
//! - `edge_upstream_failures_total` (counter): backend failures by kind
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - The action label is the pipeline exit: health, static, dispatch,
//!   deny, or an error kind
//! - Prometheus exposition on a dedicated address

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Failure to install is logged, not fatal: the router can serve
/// traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, action: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("action", action.to_string()),
    ];
    metrics::counter!("edge_requests_total", &labels).increment(1);
    metrics::histogram!("edge_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a backend transport failure.
pub fn record_upstream_failure(kind: &str) {
    metrics::counter!("edge_upstream_failures_total", "kind" => kind.to_string()).increment(1);
}
