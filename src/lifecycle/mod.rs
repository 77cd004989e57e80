//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Compile tables → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload config, swap routing state atomically
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routing state, listener last
//! - A failed reload keeps the running state and logs the errors
//! - Requests in flight finish on the state they loaded

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
