//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (normalized path):
//!     → enforcer.rs (dotfile blocklist, denied patterns,
//!                    restricted-prefix allow-lists)
//!     → Allow: pass to routing
//!     → Deny: 403, pipeline short-circuits
//! ```
//!
//! # Design Decisions
//! - Security rules are a separate data set from the rule table, so
//!   routing priority can never shadow a deny
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod enforcer;

pub use enforcer::{Enforcer, Verdict};
