//! Liveness probe subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the configured probe path
//!     → responder.rs (method check only)
//!     → 200 "healthy" / 405
//! No classification, no security evaluation, no backend call.
//! ```
//!
//! # Design Decisions
//! - Answers even when the backend is down; probes the router, not the app
//! - GET/HEAD only
//! - Constant body, minimal latency

pub mod responder;

pub use responder::respond;
