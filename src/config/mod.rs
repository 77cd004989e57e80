//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → compiled into RuleTable / Enforcer, shared via Arc
//!
//! On SIGHUP:
//!     loader.rs loads new config
//!     → validation.rs validates
//!     → tables recompiled and swapped atomically (ArcSwap)
//!     → in-flight requests keep the table they loaded
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::EdgeConfig;
pub use schema::HealthConfig;
pub use schema::ListenerConfig;
pub use schema::RouteRuleConfig;
pub use schema::SecurityConfig;
pub use schema::StaticAssetsConfig;
pub use schema::UpstreamConfig;
