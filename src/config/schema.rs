//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! router. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Ordered routing rules. Declaration order is the tiebreak within a
    /// rule kind.
    pub routes: Vec<RouteRuleConfig>,

    /// Security rules evaluated before routing.
    pub security: SecurityConfig,

    /// Static asset store and cache policy parameters.
    pub static_assets: StaticAssetsConfig,

    /// Application backend connection settings.
    pub upstream: UpstreamConfig,

    /// Liveness probe settings.
    pub health: HealthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Which matcher a routing rule compiles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKindConfig {
    /// Literal full-path match. Highest precedence.
    Exact,
    /// Regular expression over the normalized path.
    Regex,
    /// Path prefix; longer prefixes win over shorter ones.
    Prefix,
    /// Mandatory fallback; matches everything.
    CatchAll,
}

/// What a matched rule does with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleActionConfig {
    /// Serve from the static store with computed cache headers.
    Static,
    /// Forward to the application backend.
    Dispatch,
    /// Reject with 403.
    Deny,
}

/// A single routing rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteRuleConfig {
    /// Rule identifier for logging/metrics.
    pub name: String,

    /// Matcher kind.
    pub kind: RuleKindConfig,

    /// Literal path, regex, or prefix depending on `kind`. Ignored for
    /// `catch_all`.
    #[serde(default)]
    pub pattern: String,

    /// Action taken on match.
    pub action: RuleActionConfig,

    /// Asset class for `static` actions ("versioned", "media", or a
    /// custom class); selects the cache policy bucket.
    #[serde(default)]
    pub asset_class: Option<String>,

    /// Entry script for `dispatch` actions. Falls back to
    /// `upstream.default_entry_script` when absent.
    #[serde(default)]
    pub entry_script: Option<String>,
}

/// Security rules applied before routing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Path segments denied anywhere in the path, regardless of method.
    pub blocked_dotfiles: Vec<String>,

    /// Regex patterns that deny outright.
    pub denied_patterns: Vec<String>,

    /// Prefixes where only enumerated entry files may be dispatched.
    pub restricted: Vec<RestrictedPrefixConfig>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            blocked_dotfiles: vec![
                ".git".to_string(),
                ".svn".to_string(),
                ".hg".to_string(),
                ".env".to_string(),
                ".htaccess".to_string(),
                ".user.ini".to_string(),
            ],
            denied_patterns: Vec::new(),
            restricted: Vec::new(),
        }
    }
}

/// A restricted prefix and its allow-listed entry scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestrictedPrefixConfig {
    /// Path prefix, including trailing slash (e.g., "/setup/").
    pub prefix: String,

    /// Final path segments allowed to dispatch under the prefix.
    pub allowed_entry_files: Vec<String>,
}

/// Static asset store and cache policy parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticAssetsConfig {
    /// Document root for static lookups.
    pub document_root: String,

    /// Regex a path segment must fully match to count as a version token.
    pub version_token_pattern: String,

    /// Max-age for versioned assets in seconds.
    pub versioned_max_age_secs: u64,

    /// Max-age for unversioned, non-media assets in seconds.
    pub default_max_age_secs: u64,
}

impl Default for StaticAssetsConfig {
    fn default() -> Self {
        Self {
            document_root: "./pub".to_string(),
            version_token_pattern: r"^(?:v|version)\d+$".to_string(),
            versioned_max_age_secs: 31_536_000,
            default_max_age_secs: 3_600,
        }
    }
}

/// Application backend connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend address (e.g., "127.0.0.1:9000").
    pub address: String,

    /// Total request timeout in seconds. Deliberately large: the backend
    /// runs long administrative operations.
    pub timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Entry script used by the catch-all dispatch rule.
    pub default_entry_script: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:9000".to_string(),
            timeout_secs: 600,
            max_body_bytes: 8 * 1024 * 1024,
            default_entry_script: "index.php".to_string(),
        }
    }
}

/// Liveness probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Fixed probe path, answered without touching backend or store.
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl EdgeConfig {
    /// A rule set mirroring the layered location blocks this router
    /// replaces: versioned static assets, media, setup tooling, and a
    /// dispatch catch-all. Used when no config file is given and as the
    /// baseline for tests.
    pub fn example() -> Self {
        Self {
            routes: vec![
                RouteRuleConfig {
                    name: "static-versioned".to_string(),
                    kind: RuleKindConfig::Prefix,
                    pattern: "/static/".to_string(),
                    action: RuleActionConfig::Static,
                    asset_class: Some("versioned".to_string()),
                    entry_script: None,
                },
                RouteRuleConfig {
                    name: "media".to_string(),
                    kind: RuleKindConfig::Prefix,
                    pattern: "/media/".to_string(),
                    action: RuleActionConfig::Static,
                    asset_class: Some("media".to_string()),
                    entry_script: None,
                },
                RouteRuleConfig {
                    name: "setup".to_string(),
                    kind: RuleKindConfig::Prefix,
                    pattern: "/setup/".to_string(),
                    action: RuleActionConfig::Dispatch,
                    asset_class: None,
                    entry_script: Some("setup/index.php".to_string()),
                },
                RouteRuleConfig {
                    name: "app".to_string(),
                    kind: RuleKindConfig::CatchAll,
                    pattern: String::new(),
                    action: RuleActionConfig::Dispatch,
                    asset_class: None,
                    entry_script: None,
                },
            ],
            security: SecurityConfig {
                denied_patterns: vec![r"^/media/customer/".to_string()],
                restricted: vec![RestrictedPrefixConfig {
                    prefix: "/setup/".to_string(),
                    allowed_entry_files: vec!["index.php".to_string()],
                }],
                ..SecurityConfig::default()
            },
            ..Self::default()
        }
    }
}
