//! Command-line entrypoint support.
//!
//! # Responsibilities
//! - Present a command-line invocation to the router as a request source
//! - Resolve and run a task in one call for the `router-cli` binary
//!
//! # Design Decisions
//! - The verb is always `CLI`; only the path comes from the command line
//! - Errors surface as `RouteError`; exit codes derive from the error kind

use std::sync::Arc;

use crate::config::RouterConfig;
use crate::routing::{RouteError, RouteListing, RouteResult, Router, RouterMode, TypeOracle, CLI_VERB};
use crate::routing::source::RequestSource;

/// A command-line invocation: the first positional argument is the path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliInvocation {
    pub path: String,
}

impl CliInvocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl RequestSource for CliInvocation {
    fn current_verb(&self) -> String {
        CLI_VERB.to_string()
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn is_cli(&self) -> bool {
        true
    }
}

fn cli_router(config: &RouterConfig, registry: Arc<dyn TypeOracle>) -> RouteResult<Router> {
    Router::from_config(RouterMode::Cli, config, registry)
        .map_err(|e| RouteError::execution("Invalid router settings").with_source(e))
}

/// Resolve `invocation` against the CLI namespace and run the task.
pub fn run_task(
    config: &RouterConfig,
    registry: Arc<dyn TypeOracle>,
    invocation: &CliInvocation,
    strict_params: bool,
) -> RouteResult<String> {
    let mut router = cli_router(config, registry)?;
    router.prepare(invocation, None, None)?;
    let route = router.get_route(strict_params)?;
    tracing::debug!(ty = %route.type_name(), method = %route.method_name(), "Running task");
    Ok(route.call())
}

/// Routes offered by the task type `path` names, or `None` if it does not resolve.
pub fn list_tasks(
    config: &RouterConfig,
    registry: Arc<dyn TypeOracle>,
    path: &str,
) -> RouteResult<Option<Vec<RouteListing>>> {
    let mut router = cli_router(config, registry)?;
    if router.prepare(&CliInvocation::new(path), None, None).is_err() {
        return Ok(None);
    }
    Ok(router.list_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::builtin_registry;
    use crate::routing::RouteErrorKind;

    fn registry() -> Arc<dyn TypeOracle> {
        Arc::new(builtin_registry().unwrap())
    }

    #[test]
    fn test_run_task() {
        let config = RouterConfig::default();
        let out = run_task(&config, registry(), &CliInvocation::new("hello"), true).unwrap();
        assert_eq!(out, "Hello, world!");

        let out = run_task(&config, registry(), &CliInvocation::new("hello/Ann"), true).unwrap();
        assert_eq!(out, "Hello, Ann!");
    }

    #[test]
    fn test_run_task_errors() {
        let config = RouterConfig::default();
        let err = run_task(&config, registry(), &CliInvocation::new("nope"), true).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::NotFound);
        assert_eq!(err.kind().exit_code(), 2);

        let err = run_task(&config, registry(), &CliInvocation::new("hello/a/b"), true).unwrap_err();
        assert_eq!(err.subject(), "Too many params");
        assert!(run_task(&config, registry(), &CliInvocation::new("hello/a/b"), false).is_ok());
    }

    #[test]
    fn test_list_tasks() {
        let config = RouterConfig::default();
        let listing = list_tasks(&config, registry(), "hello").unwrap().unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].verb, "CLI");
        assert!(list_tasks(&config, registry(), "nope").unwrap().is_none());
    }
}
