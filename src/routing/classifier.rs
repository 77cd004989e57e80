//! Request classification.
//!
//! # Responsibilities
//! - Normalize the raw request path before any matching
//! - Match the normalized path against the RuleTable
//! - Always produce exactly one rule (catch-all backstop)
//!
//! # Design Decisions
//! - Traversal segments are rejected, not resolved: a path that tries to
//!   climb out of the document root is a client error, never a lookup
//! - Query strings are stripped by the caller and never seen here
//! - Matching is pure; the same path and table always give the same rule

use percent_encoding::percent_decode_str;

use crate::error::EdgeError;
use crate::routing::rules::{Rule, RuleTable};

/// Decode and normalize a raw request path for matching.
///
/// Percent-decodes, collapses duplicate slashes, drops `.` segments, and
/// rejects NUL bytes, non-UTF-8 escapes, and `..` segments.
pub fn normalize_path(raw: &str) -> Result<String, EdgeError> {
    if !raw.starts_with('/') {
        return Err(EdgeError::MalformedRequest("path must be absolute".into()));
    }

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| EdgeError::MalformedRequest("invalid percent-encoding".into()))?;

    if decoded.contains('\0') {
        return Err(EdgeError::MalformedRequest("NUL byte in path".into()));
    }

    let mut normalized = String::with_capacity(decoded.len());
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(EdgeError::MalformedRequest("traversal segment".into()));
            }
            s => {
                normalized.push('/');
                normalized.push_str(s);
            }
        }
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    // A trailing slash is significant for prefix rules.
    if decoded.ends_with('/') && !normalized.ends_with('/') {
        normalized.push('/');
    }

    Ok(normalized)
}

/// Match a normalized path against the table.
///
/// Exact rules first, then the specificity-ordered regex/prefix scan,
/// then the catch-all. Total by construction.
pub fn classify<'t>(path: &str, table: &'t RuleTable) -> &'t Rule {
    if let Some(rule) = table.exact(path) {
        return rule;
    }
    for rule in table.scan() {
        if rule.matches(path) {
            return rule;
        }
    }
    table.catch_all()
}
