//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (normalized path)
//!     → classifier.rs (match against RuleTable)
//!     → Return: matched Rule (always; catch-all guarantees a match)
//!
//! Rule Compilation (at startup):
//!     RouteRuleConfig[]
//!     → Compile matchers (exact map, regex, prefix)
//!     → Order by kind precedence, then specificity, then declaration
//!     → Freeze as immutable RuleTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Exact matches resolved via HashMap before any scan
//! - Deterministic: same path always matches same rule
//! - First match wins (exact > regex > prefix > catch-all)

pub mod classifier;
pub mod rules;

pub use classifier::{classify, normalize_path};
pub use rules::{Rule, RuleTable, RouteAction};
