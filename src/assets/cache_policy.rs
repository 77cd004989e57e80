//! Response cache policy for static assets.
//!
//! # Responsibilities
//! - Classify a path as versioned (contains a version token segment)
//! - Produce Cache-Control, Expires, and ETag values per asset class
//!
//! # Design Decisions
//! - Deterministic and side-effect-free; never touches storage
//! - Media (user-uploaded) assets are mutable: no-store by default
//! - Versioned assets are immutable for a year; the token in the path
//!   changes whenever the content does

use std::hash::{Hash, Hasher};

use chrono::Utc;
use regex::Regex;

use crate::config::schema::StaticAssetsConfig;

/// Asset class whose contents may change under the same path.
pub const MEDIA_CLASS: &str = "media";

/// Computed caching headers for a static response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHeaders {
    /// Cache-Control value.
    pub cache_control: String,

    /// Expires value, absent for uncacheable responses.
    pub expires: Option<String>,

    /// Weak ETag, only for versioned assets.
    pub etag: Option<String>,
}

/// Compiled cache policy parameters.
pub struct CachePolicy {
    version_token: Regex,
    versioned_max_age_secs: u64,
    default_max_age_secs: u64,
}

impl CachePolicy {
    /// Compile the policy from configuration.
    pub fn from_config(config: &StaticAssetsConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            version_token: Regex::new(&config.version_token_pattern)?,
            versioned_max_age_secs: config.versioned_max_age_secs,
            default_max_age_secs: config.default_max_age_secs,
        })
    }

    /// Whether any segment of the path is a version token.
    pub fn is_versioned(&self, path: &str) -> bool {
        path.split('/').any(|segment| self.version_token.is_match(segment))
    }

    /// Compute caching headers for a normalized path and asset class.
    pub fn compute(&self, path: &str, asset_class: &str) -> CacheHeaders {
        if asset_class == MEDIA_CLASS {
            return CacheHeaders {
                cache_control: "no-store".to_string(),
                expires: None,
                etag: None,
            };
        }

        if self.is_versioned(path) {
            return CacheHeaders {
                cache_control: format!(
                    "public, max-age={}, immutable",
                    self.versioned_max_age_secs
                ),
                expires: Some(http_date_in(self.versioned_max_age_secs)),
                etag: Some(weak_etag(path)),
            };
        }

        CacheHeaders {
            cache_control: format!("public, max-age={}", self.default_max_age_secs),
            expires: Some(http_date_in(self.default_max_age_secs)),
            etag: None,
        }
    }
}

/// RFC 7231 IMF-fixdate, `max_age` seconds from now.
fn http_date_in(max_age: u64) -> String {
    let expires = Utc::now() + chrono::Duration::seconds(max_age as i64);
    expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Weak ETag derived from the path. The version token already encodes
/// the content revision, so hashing the path is sufficient.
fn weak_etag(path: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    path.hash(&mut hasher);
    format!("W/\"{:016x}\"", hasher.finish())
}
