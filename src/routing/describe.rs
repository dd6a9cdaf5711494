//! Canonical route metadata derived from a method signature.

use serde::Serialize;

use crate::routing::matcher::split_method_name;
use crate::routing::path::Splitter;
use crate::routing::registry::{MethodDescriptor, ParamKind};

/// What a handler method looks like as a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub verb: String,
    pub action_name: String,
    /// Type path plus the action, joined by the splitter.
    pub path: String,
    /// Path followed by the URL-level parameter names.
    pub url_path: String,
    pub url_params: Vec<String>,
    pub required_params: usize,
    /// `None` when the handler is variadic.
    pub max_params: Option<usize>,
}

impl RouteInfo {
    pub fn is_params_infinite(&self) -> bool {
        self.max_params.is_none()
    }
}

/// Describe `method` as a route under `class_path`.
///
/// Returns `None` when the method identifier does not follow the
/// `VERB_action` convention.
pub fn describe_handler(
    class_path: &str,
    method: &MethodDescriptor,
    splitter: Splitter,
) -> Option<RouteInfo> {
    let parts = split_method_name(method.name())?;

    let path = if parts.action.is_empty() {
        class_path.to_string()
    } else if class_path.is_empty() {
        // Handler on the main namespace type itself.
        parts.action.to_string()
    } else {
        format!("{class_path}{splitter}{}", parts.action)
    };

    let signature = method.signature();
    let url_params: Vec<String> = signature
        .params()
        .iter()
        .map(|p| match p.kind {
            ParamKind::Required => format!("{{{}}}", p.name),
            ParamKind::Optional => format!("{{{}?}}", p.name),
            ParamKind::Variadic => format!("{{{}...}}", p.name),
        })
        .collect();

    let url_path = if url_params.is_empty() {
        path.clone()
    } else {
        format!("{path}/{}", url_params.join("/"))
    };

    Some(RouteInfo {
        verb: parts.verb.to_string(),
        action_name: parts.action.to_string(),
        path,
        url_path,
        url_params,
        required_params: signature.required_count(),
        max_params: signature.max_count(),
    })
}
