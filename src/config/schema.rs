//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::reroute::RerouteRule;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoint resolution settings.
    pub router: RouterConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Endpoint resolution settings shared by the HTTP and CLI entrypoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Splitter between type-path components: one of ".", "-", " ", "/".
    pub splitter: String,

    /// Path resolved when an HTTP request path is empty.
    pub default_path: String,

    /// Namespace holding HTTP handler types.
    pub http_namespace: String,

    /// Namespace holding CLI handler types.
    pub cli_namespace: String,

    /// Supertype every handler type must declare.
    pub parent_constraint: Option<String>,

    /// Namespace depth searched when the splitter is "/". Negative clamps to 0.
    pub max_sub_dir: i64,

    /// Verb whitelist; unset allows every verb.
    pub allowed_verbs: Option<Vec<String>>,

    /// Reject more path parameters than a handler declares.
    pub strict_params: bool,

    /// Rewrites applied before discovery.
    pub reroutes: Vec<RerouteRule>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            splitter: ".".to_string(),
            default_path: "index".to_string(),
            http_namespace: "App".to_string(),
            cli_namespace: "AppTask".to_string(),
            parent_constraint: None,
            max_sub_dir: 2,
            allowed_verbs: None,
            strict_params: true,
            reroutes: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
