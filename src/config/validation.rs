//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Guarantee classification is total (a catch-all rule must exist)
//! - Check patterns compile and prefixes are well-formed
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{EdgeConfig, RuleActionConfig, RuleKindConfig};

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BadBindAddress(String),

    #[error("route '{0}': pattern must not be empty for kind '{1}'")]
    EmptyPattern(String, &'static str),

    #[error("route '{0}': invalid regex: {1}")]
    BadRegex(String, String),

    #[error("route '{0}': prefix pattern must start with '/'")]
    RelativePrefix(String),

    #[error("route '{0}': static action requires an asset_class")]
    MissingAssetClass(String),

    #[error("routes must contain exactly one catch_all rule, found {0}")]
    CatchAllCount(usize),

    #[error("security.restricted prefix '{0}' must start and end with '/'")]
    BadRestrictedPrefix(String),

    #[error("security.restricted prefix '{0}' has an empty allow-list")]
    EmptyAllowList(String),

    #[error("security.denied_patterns entry '{0}' is not a valid regex: {1}")]
    BadDeniedPattern(String, String),

    #[error("static_assets.version_token_pattern is not a valid regex: {0}")]
    BadVersionPattern(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("health.path must start with '/'")]
    BadHealthPath,
}

/// Validate the full configuration, collecting every error.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut catch_alls = 0usize;
    for route in &config.routes {
        match route.kind {
            RuleKindConfig::CatchAll => catch_alls += 1,
            RuleKindConfig::Exact => {
                if route.pattern.is_empty() {
                    errors.push(ValidationError::EmptyPattern(route.name.clone(), "exact"));
                }
            }
            RuleKindConfig::Prefix => {
                if route.pattern.is_empty() {
                    errors.push(ValidationError::EmptyPattern(route.name.clone(), "prefix"));
                } else if !route.pattern.starts_with('/') {
                    errors.push(ValidationError::RelativePrefix(route.name.clone()));
                }
            }
            RuleKindConfig::Regex => {
                if route.pattern.is_empty() {
                    errors.push(ValidationError::EmptyPattern(route.name.clone(), "regex"));
                } else if let Err(e) = regex::Regex::new(&route.pattern) {
                    errors.push(ValidationError::BadRegex(route.name.clone(), e.to_string()));
                }
            }
        }

        if route.action == RuleActionConfig::Static && route.asset_class.is_none() {
            errors.push(ValidationError::MissingAssetClass(route.name.clone()));
        }
    }
    if catch_alls != 1 {
        errors.push(ValidationError::CatchAllCount(catch_alls));
    }

    for restricted in &config.security.restricted {
        if !restricted.prefix.starts_with('/') || !restricted.prefix.ends_with('/') {
            errors.push(ValidationError::BadRestrictedPrefix(restricted.prefix.clone()));
        }
        if restricted.allowed_entry_files.is_empty() {
            errors.push(ValidationError::EmptyAllowList(restricted.prefix.clone()));
        }
    }

    for pattern in &config.security.denied_patterns {
        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(ValidationError::BadDeniedPattern(pattern.clone(), e.to_string()));
        }
    }

    if let Err(e) = regex::Regex::new(&config.static_assets.version_token_pattern) {
        errors.push(ValidationError::BadVersionPattern(e.to_string()));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if !config.health.path.starts_with('/') {
        errors.push(ValidationError::BadHealthPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RestrictedPrefixConfig, RouteRuleConfig};

    #[test]
    fn example_config_is_valid() {
        assert!(validate_config(&EdgeConfig::example()).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = EdgeConfig::example();
        config.listener.bind_address = "not-an-address".to_string();
        config.upstream.timeout_secs = 0;
        config.routes.push(RouteRuleConfig {
            name: "bad-regex".to_string(),
            kind: crate::config::schema::RuleKindConfig::Regex,
            pattern: "[unclosed".to_string(),
            action: RuleActionConfig::Deny,
            asset_class: None,
            entry_script: None,
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "expected all errors, got {errors:?}");
    }

    #[test]
    fn table_without_catch_all_is_rejected() {
        let mut config = EdgeConfig::example();
        config.routes.retain(|r| r.kind != RuleKindConfig::CatchAll);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::CatchAllCount(0))));
    }

    #[test]
    fn restricted_prefix_needs_slashes_and_entries() {
        let mut config = EdgeConfig::example();
        config.security.restricted.push(RestrictedPrefixConfig {
            prefix: "setup".to_string(),
            allowed_entry_files: Vec::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::BadRestrictedPrefix(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyAllowList(_))));
    }
}
