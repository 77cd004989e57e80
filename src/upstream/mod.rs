//! Upstream dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch action (request parts + body, entry script, client addr)
//!     → dispatcher.rs (rewrite URI to the backend authority,
//!                      attach forwarding metadata, bounded send)
//!     → Backend response relayed verbatim, streaming
//!     → Failure mapped to 502/504, never retried
//! ```
//!
//! # Design Decisions
//! - One backend authority from config; connection pooling in the client
//! - No retries: backend calls may have side effects
//! - Timeout bounds the whole exchange, not just the connect

pub mod dispatcher;

pub use dispatcher::{Dispatcher, UpstreamError};
