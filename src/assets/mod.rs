//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! ServeStatic action (normalized path, asset class)
//!     → store.rs (read bytes under the document root)
//!     → cache_policy.rs (compute Cache-Control / Expires / ETag)
//!     → Respond 200 with headers, or 404 on miss
//! ```
//!
//! # Design Decisions
//! - The store is read-only; the router never mutates it
//! - Cache headers are a pure function of path and asset class
//! - Version-token detection drives the immutable one-year directive

pub mod cache_policy;
pub mod store;

pub use cache_policy::{CacheHeaders, CachePolicy};
pub use store::{StaticAsset, StaticStore};
