//! Built-in demonstration handlers.
//!
//! # Responsibilities
//! - Register the sample HTTP handlers under `App` and CLI tasks under `AppTask`
//! - Give the binaries something to route to out of the box
//!
//! With the default "." splitter the HTTP handlers answer:
//! ```text
//! GET /                 → App::index::GET_
//! GET /echo/a/b/c       → App::echo::GET_ (variadic)
//! GET /math.add/2/3     → App::math::GET_add
//! GET /math.neg/4       → App::math::GET_neg
//! POST /math.add/1/2    → App::math::POST_add
//! ```

use crate::routing::{HandlerRegistry, MethodDescriptor, RegistryError, Signature, TypeDescriptor};

/// Supertype carried by every built-in handler type.
pub const ENDPOINT_SUPERTYPE: &str = "Endpoint";

fn parse_number(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|_| format!("not a number: {raw}"))
}

fn param(params: &[String], index: usize) -> &str {
    params.get(index).map_or("", String::as_str)
}

fn add(params: &[String]) -> String {
    match (parse_number(param(params, 0)), parse_number(param(params, 1))) {
        (Ok(a), Ok(b)) => a.saturating_add(b).to_string(),
        (Err(e), _) | (_, Err(e)) => e,
    }
}

fn neg(params: &[String]) -> String {
    parse_number(param(params, 0)).map_or_else(|e| e, |n| n.saturating_neg().to_string())
}

/// Handlers served over HTTP.
pub fn http_types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::new("App::index")
            .supertype(ENDPOINT_SUPERTYPE)
            .method(MethodDescriptor::new("GET_", Signature::new(), |_| {
                "mini-router is running".to_string()
            })),
        TypeDescriptor::new("App::echo")
            .supertype(ENDPOINT_SUPERTYPE)
            .method(MethodDescriptor::new(
                "GET_",
                Signature::new().variadic("parts"),
                |params| params.join("/"),
            )),
        TypeDescriptor::new("App::math")
            .supertype(ENDPOINT_SUPERTYPE)
            .method(MethodDescriptor::new(
                "GET_add",
                Signature::new().required("a").required("b"),
                add,
            ))
            .method(MethodDescriptor::new(
                "POST_add",
                Signature::new().required("a").required("b"),
                add,
            ))
            .method(MethodDescriptor::new("GET_neg", Signature::new().required("n"), neg)),
    ]
}

/// Tasks run from the command line.
pub fn cli_types() -> Vec<TypeDescriptor> {
    vec![TypeDescriptor::new("AppTask::hello")
        .supertype(ENDPOINT_SUPERTYPE)
        .method(MethodDescriptor::new(
            "CLI_",
            Signature::new().optional("name"),
            |params| format!("Hello, {}!", params.first().map_or("world", String::as_str)),
        ))]
}

/// Registry holding every built-in handler.
pub fn builtin_registry() -> Result<HandlerRegistry, RegistryError> {
    let mut registry = HandlerRegistry::new();
    for ty in http_types().into_iter().chain(cli_types()) {
        registry.register(ty)?;
    }
    Ok(registry)
}
