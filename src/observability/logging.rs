//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once at startup
//! - Derive the default filter from configuration
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - RUST_LOG overrides the configured level when set
//! - Request-scoped fields (request_id, path, rule) are attached at the
//!   call sites, not here

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `log_level` comes from `observability.log_level`; the `RUST_LOG`
/// environment variable takes precedence when present.
pub fn init(log_level: &str) {
    let default_filter = format!("edge_router={log_level},tower_http={log_level}");
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
