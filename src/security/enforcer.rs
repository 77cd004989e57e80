//! Security rule evaluation.
//!
//! # Responsibilities
//! - Deny paths containing blocked dotfile segments, regardless of method
//! - Deny paths matching configured denial patterns
//! - Under restricted prefixes, allow only enumerated entry scripts
//!
//! # Design Decisions
//! - Runs before classification; a deny here is unconditional
//! - Pure decision function; callers own logging and metrics
//! - Compiled once from config, immutable afterwards

use std::collections::HashSet;

use axum::http::StatusCode;
use regex::Regex;
use thiserror::Error;

use crate::config::schema::SecurityConfig;

/// Outcome of the security check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No security rule applies; continue to classification.
    Allow,

    /// A rule matched; respond with this status and stop.
    Deny(StatusCode),
}

/// Error type for enforcer compilation.
#[derive(Debug, Error)]
pub enum EnforcerError {
    #[error("denied pattern '{0}' is invalid: {1}")]
    BadPattern(String, #[source] regex::Error),
}

struct RestrictedPrefix {
    prefix: String,
    allowed: HashSet<String>,
}

/// Compiled security rule set.
pub struct Enforcer {
    blocked_dotfiles: Vec<String>,
    denied: Vec<Regex>,
    restricted: Vec<RestrictedPrefix>,
}

impl Enforcer {
    /// Compile the security configuration.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, EnforcerError> {
        let denied = config
            .denied_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| EnforcerError::BadPattern(p.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            blocked_dotfiles: config.blocked_dotfiles.clone(),
            denied,
            restricted: config
                .restricted
                .iter()
                .map(|r| RestrictedPrefix {
                    prefix: r.prefix.clone(),
                    allowed: r.allowed_entry_files.iter().cloned().collect(),
                })
                .collect(),
        })
    }

    /// Evaluate the rule set against a normalized path.
    pub fn check(&self, path: &str) -> Verdict {
        // Blocked dotfile segment anywhere in the path.
        for segment in path.split('/') {
            if self.blocked_dotfiles.iter().any(|b| segment == b) {
                return Verdict::Deny(StatusCode::FORBIDDEN);
            }
        }

        for re in &self.denied {
            if re.is_match(path) {
                return Verdict::Deny(StatusCode::FORBIDDEN);
            }
        }

        for restricted in &self.restricted {
            // The bare prefix ("/setup") counts as under it.
            if path == restricted.prefix.trim_end_matches('/') {
                return Verdict::Deny(StatusCode::FORBIDDEN);
            }
            if let Some(rest) = path.strip_prefix(restricted.prefix.as_str()) {
                let entry = rest.rsplit('/').next().unwrap_or("");
                if restricted.allowed.contains(entry) {
                    return Verdict::Allow;
                }
                return Verdict::Deny(StatusCode::FORBIDDEN);
            }
        }

        Verdict::Allow
    }
}
