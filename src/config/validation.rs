//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the splitter, namespaces and verb tokens
//! - Check reroute rules are usable
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::path::{is_qualified_identifier, normalize, validate_splitter};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn is_verb(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let router = &config.router;

    if let Err(e) = validate_splitter(&router.splitter) {
        errors.push(ValidationError::new("router.splitter", e.to_string()));
    }

    for (field, namespace) in [
        ("router.http_namespace", &router.http_namespace),
        ("router.cli_namespace", &router.cli_namespace),
    ] {
        if !namespace.is_empty() && !is_qualified_identifier(namespace) {
            errors.push(ValidationError::new(field, format!("{namespace:?} is not a valid namespace")));
        }
    }

    if let Some(verbs) = &router.allowed_verbs {
        for verb in verbs.iter().filter(|v| !is_verb(v)) {
            errors.push(ValidationError::new(
                "router.allowed_verbs",
                format!("{verb:?} is not an upper-case verb"),
            ));
        }
    }

    for (i, rule) in router.reroutes.iter().enumerate() {
        let field = format!("router.reroutes[{i}]");
        if normalize(&rule.from).is_empty() {
            errors.push(ValidationError::new(&field, "`from` must not be empty"));
        }
        for verb in [&rule.verb, &rule.rewrite_verb].into_iter().flatten() {
            if !is_verb(verb) {
                errors.push(ValidationError::new(&field, format!("{verb:?} is not an upper-case verb")));
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
