//! Route resolution errors.
//!
//! # Responsibilities
//! - Classify per-request failures (not found, forbidden, verb not allowed, execution)
//! - Keep setup-time mistakes (bad splitter, bad registration) apart from them
//!
//! # Design Decisions
//! - Fail fast: the first failing step aborts resolution
//! - The kind knows its conventional HTTP status; rendering happens elsewhere

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Category of a per-request routing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteErrorKind {
    /// No matching type, method, route metadata, or a parameter count mismatch.
    NotFound,
    /// Constraint violation or a method that cannot be called.
    Forbidden,
    /// Verb excluded by the configured whitelist.
    MethodNotAllowed,
    /// Usage error: resolving twice, wrong execution context.
    Execution,
}

impl RouteErrorKind {
    /// Conventional HTTP status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::MethodNotAllowed => 405,
            Self::Execution => 500,
        }
    }

    /// Process exit code used by the CLI entrypoint.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound => 2,
            Self::Forbidden => 3,
            Self::MethodNotAllowed => 4,
            Self::Execution => 1,
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for RouteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed resolution or validation step.
#[derive(Debug, Error)]
#[error("{kind}: {subject}")]
pub struct RouteError {
    kind: RouteErrorKind,
    subject: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl RouteError {
    pub fn new(kind: RouteErrorKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            source: None,
        }
    }

    /// Attach the lower-level failure that caused this error.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::new(RouteErrorKind::NotFound, subject)
    }

    pub fn forbidden(subject: impl Into<String>) -> Self {
        Self::new(RouteErrorKind::Forbidden, subject)
    }

    pub fn method_not_allowed(verb: impl Into<String>) -> Self {
        Self::new(RouteErrorKind::MethodNotAllowed, verb)
    }

    pub fn execution(subject: impl Into<String>) -> Self {
        Self::new(RouteErrorKind::Execution, subject)
    }

    pub fn kind(&self) -> RouteErrorKind {
        self.kind
    }

    /// Human-readable subject ("Class", "Function", "Params missing: 1", ...).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// True when the subject reports a parameter shortfall.
    pub fn is_missing_params(&self) -> bool {
        self.kind == RouteErrorKind::NotFound && self.subject.starts_with(MISSING_PARAMS_PREFIX)
    }
}

pub(crate) const MISSING_PARAMS_PREFIX: &str = "Params missing: ";

/// Result type for resolution and validation.
pub type RouteResult<T> = Result<T, RouteError>;

/// Configuration-time mistakes, reported when the router is set up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// Splitter is not exactly one of the accepted characters.
    #[error("{0:?} invalid splitter")]
    InvalidSplitter(String),

    /// Namespace does not follow the identifier grammar.
    #[error("{0:?} is not a valid namespace")]
    InvalidNamespace(String),

    /// Verb token is empty or contains characters other than ASCII upper-case letters.
    #[error("{0:?} is not a valid verb")]
    InvalidVerb(String),
}
