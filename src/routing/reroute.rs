//! Pre-discovery rerouting.
//!
//! # Responsibilities
//! - Let an external component rewrite the verb/path pair before discovery
//! - Provide a table-driven hook built from configuration (aliases, legacy URLs)
//!
//! # Design Decisions
//! - One hook per router, consulted once per resolution
//! - `None` from an accessor keeps the original value
//! - Table rules match whole path segments, first match wins

use serde::{Deserialize, Serialize};

use crate::routing::path::normalize;

/// Capability to rewrite a request before discovery runs.
pub trait RerouteHook: Send + Sync {
    /// Inspect a candidate pair; return true to override it.
    fn change(&mut self, verb: &str, path: &str) -> bool;

    /// Replacement verb after a successful [`change`](Self::change).
    fn current_verb(&self) -> Option<&str>;

    /// Replacement path after a successful [`change`](Self::change).
    fn current_path(&self) -> Option<&str>;
}

/// A single rewrite rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RerouteRule {
    /// Path prefix to match, on segment boundaries.
    pub from: String,

    /// Replacement for the matched prefix.
    pub to: String,

    /// Only apply to this verb.
    #[serde(default)]
    pub verb: Option<String>,

    /// Verb to dispatch with instead of the original.
    #[serde(default)]
    pub rewrite_verb: Option<String>,
}

impl RerouteRule {
    fn apply(&self, verb: &str, path: &str) -> Option<String> {
        if self.verb.as_deref().is_some_and(|v| v != verb) {
            return None;
        }
        let from = normalize(&self.from);
        let to = normalize(&self.to);
        let rest = path.strip_prefix(from)?;
        if rest.is_empty() {
            Some(to.to_string())
        } else if rest.starts_with('/') {
            Some(format!("{to}{rest}"))
        } else {
            None
        }
    }
}

/// Rerouting hook backed by an ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct RerouteTable {
    rules: Vec<RerouteRule>,
    verb: Option<String>,
    path: Option<String>,
}

impl RerouteTable {
    pub fn new(rules: Vec<RerouteRule>) -> Self {
        Self {
            rules,
            verb: None,
            path: None,
        }
    }

    pub fn rules(&self) -> &[RerouteRule] {
        &self.rules
    }
}

impl RerouteHook for RerouteTable {
    fn change(&mut self, verb: &str, path: &str) -> bool {
        let path = normalize(path);
        let hit = self
            .rules
            .iter()
            .find_map(|rule| rule.apply(verb, path).map(|p| (p, rule.rewrite_verb.clone())));

        match hit {
            Some((new_path, new_verb)) => {
                tracing::debug!(
                    from = %path,
                    to = %new_path,
                    verb = ?new_verb,
                    "Request rerouted"
                );
                self.path = Some(new_path);
                self.verb = new_verb;
                true
            }
            None => {
                self.path = None;
                self.verb = None;
                false
            }
        }
    }

    fn current_verb(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    fn current_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
