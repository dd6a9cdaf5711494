//! Per-request router: configuration, one resolution, then read-only use.
//!
//! # Responsibilities
//! - Hold the router configuration (splitter, namespace, whitelist, hooks)
//! - Resolve exactly one verb/path pair
//! - Produce a validated [`Route`] or list what the resolved type offers
//!
//! # States
//! ```text
//! Configured ──prepare ok──▶ Resolved
//!     │
//!     └──prepare err──▶ Failed
//! Resolved | Failed ──prepare──▶ ExecutionError
//! ```
//!
//! # Design Decisions
//! - One instance per request or invocation; not shared across requests
//! - Setters validate at configuration time, never at request time
//! - Resolution failures are returned immediately, nothing partial is kept

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::schema::RouterConfig;
use crate::observability::metrics;
use crate::routing::describe::describe_handler;
use crate::routing::error::{RouteError, RouteResult, SetupError};
use crate::routing::matcher::split_method_name;
use crate::routing::path::{class_to_path, is_qualified_identifier, normalize, Splitter};
use crate::routing::registry::{Supertype, TypeConstraint, TypeOracle};
use crate::routing::reroute::{RerouteHook, RerouteTable};
use crate::routing::resolver::{apply_reroute, discover, Discovery, DiscoverySettings};
use crate::routing::route::Route;
use crate::routing::source::RequestSource;
use crate::routing::validator::{validate, ValidationSettings};

/// Verb used for command-line invocations.
pub const CLI_VERB: &str = "CLI";

/// Default for [`Router::max_sub_dir`].
pub const DEFAULT_MAX_SUB_DIR: usize = 2;

/// Default for [`Router::default_path`].
pub const DEFAULT_PATH: &str = "index";

/// Execution context a router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterMode {
    Http,
    Cli,
}

/// One entry of a route listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteListing {
    pub verb: String,
    pub path: String,
    pub url_params: Vec<String>,
}

#[derive(Debug)]
enum State {
    Configured,
    Failed,
    Resolved(Discovery),
}

/// Convention-based endpoint router.
pub struct Router {
    mode: RouterMode,
    oracle: Arc<dyn TypeOracle>,
    main_namespace: String,
    splitter: Splitter,
    default_path: String,
    path: Option<String>,
    constraint: Option<Box<dyn TypeConstraint>>,
    max_sub_dir: usize,
    allowed_verbs: Option<Vec<String>>,
    reroute: Option<Box<dyn RerouteHook>>,
    state: State,
}

impl Router {
    fn start(mode: RouterMode, main_namespace: &str, oracle: Arc<dyn TypeOracle>) -> Self {
        Self {
            mode,
            oracle,
            main_namespace: main_namespace.to_string(),
            splitter: Splitter::default(),
            default_path: DEFAULT_PATH.to_string(),
            path: None,
            constraint: None,
            max_sub_dir: DEFAULT_MAX_SUB_DIR,
            allowed_verbs: None,
            reroute: None,
            state: State::Configured,
        }
    }

    /// Router for HTTP requests, handlers under `main_namespace`.
    pub fn start_http(main_namespace: &str, oracle: Arc<dyn TypeOracle>) -> Self {
        Self::start(RouterMode::Http, main_namespace, oracle)
    }

    /// Router for command-line invocations, handlers under `main_namespace`.
    pub fn start_cli(main_namespace: &str, oracle: Arc<dyn TypeOracle>) -> Self {
        Self::start(RouterMode::Cli, main_namespace, oracle)
    }

    /// Build a router from a validated configuration section.
    pub fn from_config(
        mode: RouterMode,
        config: &RouterConfig,
        oracle: Arc<dyn TypeOracle>,
    ) -> Result<Self, SetupError> {
        let namespace = match mode {
            RouterMode::Http => &config.http_namespace,
            RouterMode::Cli => &config.cli_namespace,
        };
        if !namespace.is_empty() && !is_qualified_identifier(namespace) {
            return Err(SetupError::InvalidNamespace(namespace.clone()));
        }

        let mut router = Self::start(mode, namespace, oracle);
        router.set_splitter(&config.splitter)?;
        router.set_default_path(&config.default_path);
        router.set_max_sub_dir(config.max_sub_dir);
        router.set_allowed_verbs(config.allowed_verbs.clone())?;
        if let Some(parent) = &config.parent_constraint {
            router.set_parent_constraint(Supertype(parent.clone()));
        }
        if !config.reroutes.is_empty() {
            router.set_reroute(RerouteTable::new(config.reroutes.clone()));
        }
        Ok(router)
    }

    pub fn mode(&self) -> RouterMode {
        self.mode
    }

    pub fn splitter(&self) -> Splitter {
        self.splitter
    }

    /// Set the character separating type-path components.
    ///
    /// With `/`, also consider [`set_max_sub_dir`](Self::set_max_sub_dir).
    pub fn set_splitter(&mut self, splitter: &str) -> Result<(), SetupError> {
        self.splitter = Splitter::parse(splitter)?;
        Ok(())
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    /// Path used when an HTTP request path is empty.
    pub fn set_default_path(&mut self, default_path: &str) {
        self.default_path = default_path.to_string();
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Path to resolve instead of the one reported by the request source.
    pub fn set_path(&mut self, path: &str) {
        self.path = Some(path.to_string());
    }

    pub fn main_namespace(&self) -> &str {
        &self.main_namespace
    }

    pub fn allowed_verbs(&self) -> Option<&[String]> {
        self.allowed_verbs.as_deref()
    }

    /// Restrict routable verbs; `None` allows all.
    pub fn set_allowed_verbs(&mut self, verbs: Option<Vec<String>>) -> Result<(), SetupError> {
        if let Some(bad) = verbs
            .iter()
            .flatten()
            .find(|v| v.is_empty() || !v.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(SetupError::InvalidVerb(bad.clone()));
        }
        self.allowed_verbs = verbs;
        Ok(())
    }

    pub fn max_sub_dir(&self) -> usize {
        self.max_sub_dir
    }

    /// Namespace depth searched when the splitter is `/`. Negative values clamp to 0.
    ///
    /// Every extra level may cost one more existence check per request.
    pub fn set_max_sub_dir(&mut self, max_sub_dir: i64) {
        self.max_sub_dir = usize::try_from(max_sub_dir.max(0)).unwrap_or(usize::MAX);
    }

    pub fn set_reroute(&mut self, hook: impl RerouteHook + 'static) {
        self.reroute = Some(Box::new(hook));
    }

    pub fn clear_reroute(&mut self) {
        self.reroute = None;
    }

    pub fn set_parent_constraint(&mut self, constraint: impl TypeConstraint + 'static) {
        self.constraint = Some(Box::new(constraint));
    }

    /// Resolve the endpoint.
    ///
    /// `verb` and `path` override what `source` reports. May be called once.
    pub fn prepare(
        &mut self,
        source: &dyn RequestSource,
        verb: Option<&str>,
        path: Option<&str>,
    ) -> RouteResult<()> {
        if !matches!(self.state, State::Configured) {
            return Err(RouteError::execution("Router prepare twice"));
        }
        let start = Instant::now();

        let outcome = match self.mode {
            RouterMode::Http => self.prepare_http(source, verb, path),
            RouterMode::Cli => self.prepare_cli(source, verb, path),
        };

        match outcome {
            Ok(discovery) => {
                tracing::debug!(
                    verb = %discovery.verb,
                    ty = %discovery.ty.name(),
                    action = %discovery.action_name,
                    params = discovery.params.len(),
                    method_found = discovery.method.is_some(),
                    "Endpoint resolved"
                );
                metrics::record_resolution("resolved", start);
                self.state = State::Resolved(discovery);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(kind = %e.kind(), subject = %e.subject(), "Endpoint resolution failed");
                metrics::record_resolution(e.kind().as_str(), start);
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    fn prepare_http(
        &mut self,
        source: &dyn RequestSource,
        verb: Option<&str>,
        path: Option<&str>,
    ) -> RouteResult<Discovery> {
        if source.is_cli() {
            return Err(RouteError::execution("Execution by CLI is not allowed"));
        }
        if source.headers_sent() {
            return Err(RouteError::execution("Headers has been sent"));
        }
        let raw = self.requested_path(source, path);
        let mut path = normalize(&raw).to_string();
        if path.is_empty() {
            path = normalize(&self.default_path).to_string();
        }
        let verb = verb.map_or_else(|| source.current_verb(), str::to_string);
        self.load_endpoint(&verb, &path)
    }

    fn prepare_cli(
        &mut self,
        source: &dyn RequestSource,
        verb: Option<&str>,
        path: Option<&str>,
    ) -> RouteResult<Discovery> {
        if !source.is_cli() {
            return Err(RouteError::execution("Only execution by CLI is allowed"));
        }
        let raw = self.requested_path(source, path);
        let path = normalize(&raw).to_string();
        self.load_endpoint(verb.unwrap_or(CLI_VERB), &path)
    }

    fn requested_path(&self, source: &dyn RequestSource, path: Option<&str>) -> String {
        path.or(self.path.as_deref())
            .map_or_else(|| source.current_path(), str::to_string)
    }

    fn load_endpoint(&mut self, verb: &str, path: &str) -> RouteResult<Discovery> {
        let (verb, path) = apply_reroute(self.reroute.as_deref_mut(), verb, path);
        let settings = DiscoverySettings {
            splitter: self.splitter,
            main_namespace: &self.main_namespace,
            max_sub_dir: self.max_sub_dir,
            constraint: self.constraint.as_deref(),
        };
        discover(&settings, self.oracle.as_ref(), &verb, &path)
    }

    fn resolved(&self) -> Option<&Discovery> {
        match &self.state {
            State::Resolved(discovery) => Some(discovery),
            State::Configured | State::Failed => None,
        }
    }

    /// Resolved verb.
    pub fn method(&self) -> Option<&str> {
        self.resolved().map(|d| d.verb.as_str())
    }

    /// Resolved action name (possibly empty).
    pub fn name(&self) -> Option<&str> {
        self.resolved().map(|d| d.action_name.as_str())
    }

    /// Leftover path segments.
    pub fn params(&self) -> Option<&[String]> {
        self.resolved().map(|d| d.params.as_slice())
    }

    /// Qualified name of the resolved type.
    pub fn type_name(&self) -> Option<&str> {
        self.resolved().map(|d| d.ty.name())
    }

    /// Path form of the resolved type.
    pub fn class_path(&self) -> Option<String> {
        self.resolved()
            .map(|d| class_to_path(&self.main_namespace, d.ty.name(), self.splitter))
    }

    /// Validate the resolution and produce the executable route.
    ///
    /// With `strict_params`, more leftover segments than a non-variadic
    /// handler declares are rejected; the minimum is always enforced.
    pub fn get_route(&self, strict_params: bool) -> RouteResult<Route> {
        let discovery = self
            .resolved()
            .ok_or_else(|| RouteError::not_found("Class"))?;
        let settings = ValidationSettings {
            splitter: self.splitter,
            main_namespace: &self.main_namespace,
            allowed_verbs: self.allowed_verbs.as_deref(),
            strict_params,
        };
        validate(&settings, discovery)
    }

    /// Verbs the resolved type accepts for action `name`, filtered by the whitelist.
    pub fn list_allowed_verbs_for_action(&self, name: &str) -> Option<Vec<String>> {
        let discovery = self.resolved()?;
        let instantiable = discovery.ty.is_instantiable();
        let verbs = discovery
            .ty
            .public_methods()
            .filter(|m| instantiable || m.is_static())
            .filter_map(|m| split_method_name(m.name()))
            .filter(|parts| parts.action == name)
            .map(|parts| parts.verb.to_string())
            .filter(|verb| self.is_allowed(verb))
            .collect();
        Some(verbs)
    }

    /// Every route the resolved type exposes, grouped by verb in first-seen order.
    pub fn list_routes(&self) -> Option<Vec<RouteListing>> {
        let discovery = self.resolved()?;
        let ty = &discovery.ty;
        let instantiable = ty.is_instantiable();
        let class_path = class_to_path(&self.main_namespace, ty.name(), self.splitter);

        let mut groups: Vec<(String, Vec<RouteListing>)> = Vec::new();
        let infos = ty
            .public_methods()
            .filter(|m| instantiable || m.is_static())
            .filter_map(|m| describe_handler(&class_path, m, self.splitter));
        for info in infos {
            let listing = RouteListing {
                verb: info.verb.clone(),
                path: info.path,
                url_params: info.url_params,
            };
            match groups.iter_mut().find(|(verb, _)| *verb == info.verb) {
                Some((_, group)) => group.push(listing),
                None => groups.push((info.verb, vec![listing])),
            }
        }

        Some(
            groups
                .into_iter()
                .filter(|(verb, _)| self.is_allowed(verb))
                .flat_map(|(_, group)| group)
                .collect(),
        )
    }

    fn is_allowed(&self, verb: &str) -> bool {
        self.allowed_verbs
            .as_ref()
            .map_or(true, |allowed| allowed.iter().any(|v| v == verb))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("mode", &self.mode)
            .field("main_namespace", &self.main_namespace)
            .field("splitter", &self.splitter)
            .field("max_sub_dir", &self.max_sub_dir)
            .field("allowed_verbs", &self.allowed_verbs)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
