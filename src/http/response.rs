//! Response rendering.
//!
//! # Responsibilities
//! - Wrap handler output in a 200 response
//! - Map routing errors to HTTP status codes and bodies
//! - Advertise accepted verbs on 405 responses
//!
//! # Design Decisions
//! - Plain-text bodies; content negotiation is out of scope
//! - Execution errors are logged and rendered without internals

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::error::{RouteError, RouteErrorKind};

/// Body text for a routing error.
pub fn error_body(err: &RouteError) -> String {
    match err.kind() {
        RouteErrorKind::NotFound if err.is_missing_params() => {
            format!("Missing parts in URL.\n{}", err.subject())
        }
        RouteErrorKind::NotFound => format!("Not found: {}", err.subject()),
        RouteErrorKind::Forbidden => format!("Forbidden: {}", err.subject()),
        RouteErrorKind::MethodNotAllowed => format!("Method not allowed: {}", err.subject()),
        RouteErrorKind::Execution => "Internal routing error".to_string(),
    }
}

/// Render a routing error; `allow` fills the `Allow` header of 405 responses.
pub fn error_response(err: &RouteError, allow: Option<&[String]>) -> Response {
    let status =
        StatusCode::from_u16(err.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.kind() == RouteErrorKind::Execution {
        tracing::error!(error = %err, "Routing execution error");
    }

    let mut response = (status, error_body(err)).into_response();
    if err.kind() == RouteErrorKind::MethodNotAllowed {
        if let Some(value) = allow.and_then(|verbs| HeaderValue::from_str(&verbs.join(", ")).ok()) {
            response.headers_mut().insert(header::ALLOW, value);
        }
    }
    response
}

/// Render handler output.
pub fn route_response(body: String) -> Response {
    (StatusCode::OK, body).into_response()
}
