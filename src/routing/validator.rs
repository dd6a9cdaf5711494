//! Turn a discovery into an executable route.
//!
//! # Responsibilities
//! - Enforce the verb whitelist
//! - Check the method is public and callable on the type
//! - Cross-check discovery against canonical route metadata
//! - Enforce parameter arity (strict or loose)

use crate::routing::describe::describe_handler;
use crate::routing::error::{RouteError, RouteResult, MISSING_PARAMS_PREFIX};
use crate::routing::path::{class_to_path, Splitter};
use crate::routing::resolver::Discovery;
use crate::routing::route::Route;

/// Router settings validation depends on.
#[derive(Debug, Clone, Copy)]
pub struct ValidationSettings<'a> {
    pub splitter: Splitter,
    pub main_namespace: &'a str,
    pub allowed_verbs: Option<&'a [String]>,
    /// Reject more leftover segments than a non-variadic handler declares.
    pub strict_params: bool,
}

/// Validate `discovery` and bind its leftover segments.
pub fn validate(settings: &ValidationSettings<'_>, discovery: &Discovery) -> RouteResult<Route> {
    if let Some(allowed) = settings.allowed_verbs {
        if !allowed.iter().any(|v| *v == discovery.verb) {
            return Err(RouteError::method_not_allowed(discovery.verb.clone()));
        }
    }

    let ty = &discovery.ty;
    let method = discovery
        .method
        .as_ref()
        .ok_or_else(|| RouteError::not_found("Function"))?;

    if !method.is_public() {
        return Err(RouteError::forbidden("Function"));
    }
    if !ty.is_instantiable() && !method.is_static() {
        return Err(RouteError::forbidden("Function"));
    }

    let class_path = class_to_path(settings.main_namespace, ty.name(), settings.splitter);
    let info = describe_handler(&class_path, method, settings.splitter)
        .filter(|info| info.verb == discovery.verb && info.action_name == discovery.action_name)
        .ok_or_else(|| {
            tracing::debug!(
                ty = %ty.name(),
                method = %method.name(),
                verb = %discovery.verb,
                action = %discovery.action_name,
                "Route metadata disagrees with discovery"
            );
            RouteError::not_found("Route")
        })?;

    let supplied = discovery.params.len();
    if info.required_params > supplied {
        let missing = info.required_params - supplied;
        return Err(RouteError::not_found(format!("{MISSING_PARAMS_PREFIX}{missing}")));
    }
    if settings.strict_params {
        if let Some(max) = info.max_params {
            if max < supplied {
                return Err(RouteError::not_found("Too many params"));
            }
        }
    }

    Ok(Route::new(
        info,
        ty.clone(),
        method.name().to_string(),
        method.handler().clone(),
        discovery.params.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::RouteErrorKind;
    use crate::routing::registry::{MethodDescriptor, Signature, TypeDescriptor};
    use std::sync::Arc;

    fn discovery(ty: TypeDescriptor, verb: &str, action: &str, params: &[&str]) -> Discovery {
        let ty = Arc::new(ty);
        let method = ty
            .find_method(&format!("{verb}_{action}"))
            .cloned();
        Discovery {
            verb: verb.into(),
            ty,
            action_name: action.into(),
            method,
            params: params.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn settings() -> ValidationSettings<'static> {
        ValidationSettings {
            splitter: Splitter::default(),
            main_namespace: "App",
            allowed_verbs: None,
            strict_params: true,
        }
    }

    fn echo(name: &str, signature: Signature) -> MethodDescriptor {
        MethodDescriptor::new(name, signature, |args| args.join(","))
    }

    #[test]
    fn test_valid_route() {
        let ty = TypeDescriptor::new("App::users")
            .method(echo("GET_show", Signature::new().required("id")));
        let route = validate(&settings(), &discovery(ty, "GET", "show", &["7"])).unwrap();
        assert_eq!(route.path(), "users.show");
        assert_eq!(route.exec_params(), ["7"]);
        assert_eq!(route.call(), "7");
    }

    #[test]
    fn test_missing_method() {
        let ty = TypeDescriptor::new("App::users");
        let err = validate(&settings(), &discovery(ty, "GET", "", &[])).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::NotFound);
        assert_eq!(err.subject(), "Function");
    }

    #[test]
    fn test_private_and_non_instantiable() {
        let ty = TypeDescriptor::new("App::users")
            .method(echo("GET_", Signature::new()).into_private());
        let err = validate(&settings(), &discovery(ty, "GET", "", &[])).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::Forbidden);

        let ty = TypeDescriptor::new("App::tools")
            .abstract_type()
            .method(echo("GET_", Signature::new()));
        let err = validate(&settings(), &discovery(ty, "GET", "", &[])).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::Forbidden);

        let ty = TypeDescriptor::new("App::tools")
            .abstract_type()
            .method(echo("GET_", Signature::new()).into_static());
        assert!(validate(&settings(), &discovery(ty, "GET", "", &[])).is_ok());
    }

    #[test]
    fn test_metadata_mismatch() {
        // Case-insensitive lookup finds GET_Show for action "show".
        let ty = TypeDescriptor::new("App::users").method(echo("GET_Show", Signature::new()));
        let err = validate(&settings(), &discovery(ty, "GET", "show", &[])).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::NotFound);
        assert_eq!(err.subject(), "Route");
    }

    #[test]
    fn test_arity() {
        let two = || {
            TypeDescriptor::new("App::math")
                .method(echo("GET_add", Signature::new().required("a").required("b")))
        };
        let err = validate(&settings(), &discovery(two(), "GET", "add", &["1"])).unwrap_err();
        assert_eq!(err.subject(), "Params missing: 1");
        assert!(err.is_missing_params());

        let one = || {
            TypeDescriptor::new("App::math")
                .method(echo("GET_neg", Signature::new().required("a")))
        };
        let err = validate(&settings(), &discovery(one(), "GET", "neg", &["1", "2"])).unwrap_err();
        assert_eq!(err.subject(), "Too many params");

        let loose = ValidationSettings {
            strict_params: false,
            ..settings()
        };
        let route = validate(&loose, &discovery(one(), "GET", "neg", &["1", "2"])).unwrap();
        assert_eq!(route.exec_params(), ["1", "2"]);

        let variadic = TypeDescriptor::new("App::echo")
            .method(echo("GET_", Signature::new().variadic("words")));
        assert!(validate(&settings(), &discovery(variadic, "GET", "", &["a", "b", "c"])).is_ok());
    }

    #[test]
    fn test_verb_whitelist() {
        let allowed = vec!["POST".to_string()];
        let settings = ValidationSettings {
            allowed_verbs: Some(&allowed),
            ..settings()
        };
        let ty = TypeDescriptor::new("App::users").method(echo("GET_", Signature::new()));
        let err = validate(&settings, &discovery(ty, "GET", "", &[])).unwrap_err();
        assert_eq!(err.kind(), RouteErrorKind::MethodNotAllowed);
        assert_eq!(err.subject(), "GET");
    }
}
