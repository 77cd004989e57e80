//! Rule table storage and compilation.
//!
//! # Responsibilities
//! - Compile route configuration into matchers
//! - Store rules in match order (kind precedence, specificity, declaration)
//! - Guarantee a catch-all exists so classification is total
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) exact lookup via HashMap
//! - O(n) scan over regex/prefix rules (acceptable for typical rule counts)
//! - Specificity of a regex rule is the length of its literal prefix

use std::collections::HashMap;

use axum::http::StatusCode;
use regex::Regex;
use thiserror::Error;

use crate::config::schema::{RouteRuleConfig, RuleActionConfig, RuleKindConfig, UpstreamConfig};

/// Error type for rule compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("route '{0}': invalid pattern: {1}")]
    BadPattern(String, #[source] regex::Error),

    #[error("rule table has no catch-all rule")]
    MissingCatchAll,
}

/// What to do with a classified request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Serve from the static store; `asset_class` selects the cache bucket.
    ServeStatic { asset_class: String },

    /// Forward to the application backend through the given entry script.
    Dispatch { entry_script: String },

    /// Reject locally.
    Deny { status: StatusCode },
}

/// How a rule matches a normalized path.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    /// Full-path literal.
    Literal(String),

    /// Regular expression.
    Regex(Regex),

    /// Path prefix.
    Prefix(String),
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Literal(literal) => path == literal,
            PathMatcher::Regex(re) => re.is_match(path),
            PathMatcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// A compiled routing rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Identifier for logging and metrics.
    pub name: String,

    /// Compiled matcher.
    pub matcher: PathMatcher,

    /// Action taken when this rule wins.
    pub action: RouteAction,
}

impl Rule {
    /// Whether this rule matches the given normalized path.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Immutable, ordered rule table.
///
/// Built once from configuration; shared read-only across requests.
#[derive(Debug)]
pub struct RuleTable {
    /// Exact-literal rules, resolved before any scan.
    exact: HashMap<String, Rule>,

    /// Regex and prefix rules in final match order.
    scan: Vec<Rule>,

    /// Mandatory fallback.
    catch_all: Rule,
}

/// The leading literal characters of a regex pattern, used as its
/// specificity measure. Stops at the first metacharacter.
fn regex_literal_prefix(pattern: &str) -> usize {
    let trimmed = pattern.strip_prefix('^').unwrap_or(pattern);
    let mut len = 0;
    let mut chars = trimmed.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                // An escaped metacharacter still matches one literal char.
                if chars.next().is_none() {
                    break;
                }
                len += 1;
            }
            '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '$' => break,
            _ => len += 1,
        }
    }
    len
}

impl RuleTable {
    /// Compile the configured routes into an immutable table.
    ///
    /// Assumes the config already passed semantic validation; compile
    /// errors are still surfaced rather than panicking.
    pub fn from_config(
        routes: &[RouteRuleConfig],
        upstream: &UpstreamConfig,
    ) -> Result<Self, CompileError> {
        let mut exact = HashMap::new();
        let mut scan_entries: Vec<(u8, usize, usize, Rule)> = Vec::new();
        let mut catch_all = None;

        for (decl_index, route) in routes.iter().enumerate() {
            let action = compile_action(route, upstream);
            match route.kind {
                RuleKindConfig::Exact => {
                    let rule = Rule {
                        name: route.name.clone(),
                        matcher: PathMatcher::Literal(route.pattern.clone()),
                        action,
                    };
                    // First declaration wins on duplicate literals.
                    exact.entry(route.pattern.clone()).or_insert(rule);
                }
                RuleKindConfig::Regex => {
                    let re = Regex::new(&route.pattern)
                        .map_err(|e| CompileError::BadPattern(route.name.clone(), e))?;
                    let specificity = regex_literal_prefix(&route.pattern);
                    scan_entries.push((
                        0,
                        specificity,
                        decl_index,
                        Rule {
                            name: route.name.clone(),
                            matcher: PathMatcher::Regex(re),
                            action,
                        },
                    ));
                }
                RuleKindConfig::Prefix => {
                    scan_entries.push((
                        1,
                        route.pattern.len(),
                        decl_index,
                        Rule {
                            name: route.name.clone(),
                            matcher: PathMatcher::Prefix(route.pattern.clone()),
                            action,
                        },
                    ));
                }
                RuleKindConfig::CatchAll => {
                    if catch_all.is_none() {
                        catch_all = Some(Rule {
                            name: route.name.clone(),
                            matcher: PathMatcher::Prefix("/".to_string()),
                            action,
                        });
                    }
                }
            }
        }

        // Regex before prefix, longer literal prefix first, declaration
        // order as the tiebreak.
        scan_entries.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.cmp(&a.1))
                .then(a.2.cmp(&b.2))
        });

        Ok(Self {
            exact,
            scan: scan_entries.into_iter().map(|(_, _, _, rule)| rule).collect(),
            catch_all: catch_all.ok_or(CompileError::MissingCatchAll)?,
        })
    }

    pub(crate) fn exact(&self, path: &str) -> Option<&Rule> {
        self.exact.get(path)
    }

    pub(crate) fn scan(&self) -> &[Rule] {
        &self.scan
    }

    pub(crate) fn catch_all(&self) -> &Rule {
        &self.catch_all
    }

    /// Total number of compiled rules, catch-all included.
    pub fn len(&self) -> usize {
        self.exact.len() + self.scan.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn compile_action(route: &RouteRuleConfig, upstream: &UpstreamConfig) -> RouteAction {
    match route.action {
        RuleActionConfig::Static => RouteAction::ServeStatic {
            asset_class: route
                .asset_class
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        },
        RuleActionConfig::Dispatch => RouteAction::Dispatch {
            entry_script: route
                .entry_script
                .clone()
                .unwrap_or_else(|| upstream.default_entry_script.clone()),
        },
        RuleActionConfig::Deny => RouteAction::Deny {
            status: StatusCode::FORBIDDEN,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::EdgeConfig;

    fn table(config: &EdgeConfig) -> RuleTable {
        RuleTable::from_config(&config.routes, &config.upstream).unwrap()
    }

    #[test]
    fn compiles_example_config() {
        let config = EdgeConfig::example();
        let t = table(&config);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn missing_catch_all_is_an_error() {
        let mut config = EdgeConfig::example();
        config.routes.retain(|r| r.kind != RuleKindConfig::CatchAll);
        let err = RuleTable::from_config(&config.routes, &config.upstream).unwrap_err();
        assert!(matches!(err, CompileError::MissingCatchAll));
    }

    #[test]
    fn longer_prefix_sorts_first() {
        let mut config = EdgeConfig::example();
        config.routes.insert(
            0,
            RouteRuleConfig {
                name: "static-deep".to_string(),
                kind: RuleKindConfig::Prefix,
                pattern: "/static/versioned/".to_string(),
                action: RuleActionConfig::Static,
                asset_class: Some("versioned".to_string()),
                entry_script: None,
            },
        );
        let t = table(&config);
        let prefixes: Vec<_> = t
            .scan()
            .iter()
            .map(|r| match &r.matcher {
                PathMatcher::Prefix(p) => p.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(prefixes[0], "/static/versioned/");
    }

    #[test]
    fn regex_literal_prefix_stops_at_metachar() {
        assert_eq!(regex_literal_prefix(r"^/static/.*\.css$"), 8);
        assert_eq!(regex_literal_prefix(r"^/media/"), 7);
        assert_eq!(regex_literal_prefix(r".*"), 0);
        assert_eq!(regex_literal_prefix(r"^/a\.b"), 4);
    }

    #[test]
    fn dispatch_without_entry_script_uses_upstream_default() {
        let config = EdgeConfig::example();
        let t = table(&config);
        match &t.catch_all().action {
            RouteAction::Dispatch { entry_script } => {
                assert_eq!(entry_script, &config.upstream.default_entry_script);
            }
            other => panic!("catch-all should dispatch, got {other:?}"),
        }
    }
}
