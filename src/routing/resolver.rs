//! Endpoint discovery.
//!
//! # Data Flow
//! ```text
//! (verb, path)
//!     → reroute hook (optional rewrite)
//!     → split on '/'
//!     → splitter != '/': compact discovery (first segment is the type address)
//!       splitter == '/': incremental discovery (grow namespace one segment at a time)
//!     → constraint check
//!     → method lookup by VERB_action
//!     → Discovery { type, action, method?, leftover params }
//! ```
//!
//! # Design Decisions
//! - A missing method is not an error here; validation reports it
//! - Compact discovery falls back exactly once (last component becomes the action)
//! - Incremental discovery is bounded by `max_sub_dir + 1` candidate lengths

use std::sync::Arc;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::matcher::method_identifier;
use crate::routing::path::{
    is_qualified_identifier, normalize, qualify, Splitter, NAMESPACE_SEPARATOR,
};
use crate::routing::registry::{MethodDescriptor, TypeConstraint, TypeDescriptor, TypeOracle};
use crate::routing::reroute::RerouteHook;

/// Router settings discovery depends on.
#[derive(Debug, Clone, Copy)]
pub struct DiscoverySettings<'a> {
    pub splitter: Splitter,
    pub main_namespace: &'a str,
    pub max_sub_dir: usize,
    pub constraint: Option<&'a dyn TypeConstraint>,
}

/// Outcome of discovery: a type, an action, and what is left of the path.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub verb: String,
    pub ty: Arc<TypeDescriptor>,
    pub action_name: String,
    pub method: Option<MethodDescriptor>,
    pub params: Vec<String>,
}

/// Let the hook rewrite the pair; a `None` accessor keeps the original value.
pub fn apply_reroute(
    hook: Option<&mut (dyn RerouteHook + 'static)>,
    verb: &str,
    path: &str,
) -> (String, String) {
    if let Some(hook) = hook {
        if hook.change(verb, path) {
            let new_path = normalize(hook.current_path().unwrap_or(path)).to_string();
            let new_verb = hook.current_verb().unwrap_or(verb).to_string();
            return (new_verb, new_path);
        }
    }
    (verb.to_string(), path.to_string())
}

/// Locate the handler type, action, and method for `verb` and `path`.
pub fn discover(
    settings: &DiscoverySettings<'_>,
    oracle: &dyn TypeOracle,
    verb: &str,
    path: &str,
) -> RouteResult<Discovery> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.is_empty() {
        return Err(RouteError::not_found("Class"));
    }

    if settings.splitter.is_slash() {
        discover_incremental(settings, oracle, verb, &segments)
    } else {
        discover_compact(settings, oracle, verb, &segments)
    }
}

/// First segment is a splitter-joined type address with an optional action suffix.
fn discover_compact(
    settings: &DiscoverySettings<'_>,
    oracle: &dyn TypeOracle,
    verb: &str,
    segments: &[&str],
) -> RouteResult<Discovery> {
    let address = segments
        .first()
        .ok_or_else(|| RouteError::not_found("Class"))?;
    let relative = address.replace(settings.splitter.as_char(), NAMESPACE_SEPARATOR);
    if !is_qualified_identifier(&relative) {
        return Err(RouteError::not_found("Class"));
    }

    let candidate = qualify(settings.main_namespace, &relative);
    let (ty, action_name) = match oracle.describe(&candidate) {
        Ok(ty) => (ty, String::new()),
        Err(_) => {
            // The shortened name may be the main namespace itself.
            let (shortened, action) = candidate
                .rsplit_once(NAMESPACE_SEPARATOR)
                .filter(|(head, _)| !head.is_empty())
                .ok_or_else(|| RouteError::not_found("Class"))?;
            tracing::trace!(candidate = %candidate, fallback = %shortened, "Retrying with action suffix");
            let ty = oracle
                .describe(&shortened)
                .map_err(|e| RouteError::not_found("Class").with_source(e))?;
            (ty, action.to_string())
        }
    };

    check_constraint(settings, &ty)?;

    let method = ty
        .find_method(&method_identifier(verb, &action_name))
        .cloned();

    Ok(Discovery {
        verb: verb.to_string(),
        ty,
        action_name,
        method,
        params: segments[1..].iter().map(|s| s.to_string()).collect(),
    })
}

/// Every slash may be a namespace boundary; grow the candidate until a type exists.
fn discover_incremental(
    settings: &DiscoverySettings<'_>,
    oracle: &dyn TypeOracle,
    verb: &str,
    segments: &[&str],
) -> RouteResult<Discovery> {
    let limit = settings.max_sub_dir.saturating_add(1);
    let mut len = 0;
    let candidate = loop {
        len += 1;
        // Past the last segment every candidate repeats the full path.
        if len > limit || len > segments.len() {
            return Err(RouteError::not_found("Class"));
        }
        let relative = segments[..len].join(NAMESPACE_SEPARATOR);
        if !is_qualified_identifier(&relative) {
            return Err(RouteError::not_found("Class"));
        }
        let candidate = qualify(settings.main_namespace, &relative);
        tracing::trace!(candidate = %candidate, depth = len, "Checking handler type");
        if oracle.exists(&candidate) {
            break candidate;
        }
    };

    let ty = oracle
        .describe(&candidate)
        .map_err(|e| RouteError::not_found("Class").with_source(e))?;
    check_constraint(settings, &ty)?;

    let mut action_name = segments.get(len).copied().unwrap_or_default().to_string();
    let mut method = ty.find_method(&method_identifier(verb, &action_name)).cloned();
    if method.is_some() {
        if !action_name.is_empty() {
            len += 1;
        }
    } else if !action_name.is_empty() {
        // Leave the segment in place as a parameter for the bare handler.
        action_name.clear();
        method = ty.find_method(&method_identifier(verb, "")).cloned();
    }

    Ok(Discovery {
        verb: verb.to_string(),
        ty,
        action_name,
        method,
        params: segments[len..].iter().map(|s| s.to_string()).collect(),
    })
}

fn check_constraint(settings: &DiscoverySettings<'_>, ty: &TypeDescriptor) -> RouteResult<()> {
    match settings.constraint {
        Some(constraint) if !constraint.admits(ty) => {
            tracing::debug!(ty = %ty.name(), constraint = ?constraint, "Handler type rejected by constraint");
            Err(RouteError::forbidden("Class"))
        }
        _ => Ok(()),
    }
}
