//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Extract routing-relevant information (verb, path) for the router
//! - Percent-decode the path before routing
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Only method and path are read; body and headers stay with the handler layer

use std::str::Utf8Error;

use axum::http::{HeaderValue, Request};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::source::RequestSource;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of `request`, or "unknown" before the layer ran.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Verb and path of an HTTP request, as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestInfo {
    pub method: String,
    pub path: String,
}

impl HttpRequestInfo {
    /// Fails when the decoded path is not UTF-8.
    pub fn from_request<B>(request: &Request<B>) -> Result<Self, Utf8Error> {
        let path = percent_decode_str(request.uri().path()).decode_utf8()?;
        Ok(Self {
            method: request.method().as_str().to_string(),
            path: path.into_owned(),
        })
    }
}

impl RequestSource for HttpRequestInfo {
    fn current_verb(&self) -> String {
        self.method.clone()
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn is_cli(&self) -> bool {
        false
    }
}
