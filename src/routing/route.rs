//! A validated, executable route.

use std::fmt;
use std::sync::Arc;

use crate::routing::describe::RouteInfo;
use crate::routing::registry::{Handler, TypeDescriptor};

/// Immutable result of a successful resolution.
#[derive(Clone)]
pub struct Route {
    info: RouteInfo,
    ty: Arc<TypeDescriptor>,
    method_name: String,
    handler: Handler,
    exec_params: Vec<String>,
}

impl Route {
    pub(crate) fn new(
        info: RouteInfo,
        ty: Arc<TypeDescriptor>,
        method_name: String,
        handler: Handler,
        exec_params: Vec<String>,
    ) -> Self {
        Self {
            info,
            ty,
            method_name,
            handler,
            exec_params,
        }
    }

    /// Canonical path, e.g. `users.show`.
    pub fn path(&self) -> &str {
        &self.info.path
    }

    pub fn verb(&self) -> &str {
        &self.info.verb
    }

    pub fn action_name(&self) -> &str {
        &self.info.action_name
    }

    pub fn required_params(&self) -> usize {
        self.info.required_params
    }

    /// Declared maximum, `None` when unbounded.
    pub fn max_params(&self) -> Option<usize> {
        self.info.max_params
    }

    pub fn is_params_infinite(&self) -> bool {
        self.info.is_params_infinite()
    }

    pub fn url_params(&self) -> &[String] {
        &self.info.url_params
    }

    pub fn info(&self) -> &RouteInfo {
        &self.info
    }

    /// Qualified name of the handler type.
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Leftover path segments bound as positional arguments.
    pub fn exec_params(&self) -> &[String] {
        &self.exec_params
    }

    /// Invoke the handler with the bound parameters.
    pub fn call(&self) -> String {
        (self.handler)(&self.exec_params)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("info", &self.info)
            .field("type", &self.ty.name())
            .field("method", &self.method_name)
            .field("exec_params", &self.exec_params)
            .finish_non_exhaustive()
    }
}
