//! Path normalization and namespace naming rules.
//!
//! # Responsibilities
//! - Trim separators off raw request paths
//! - Validate the configured splitter character
//! - Check candidate namespaces against the identifier grammar
//! - Convert a qualified type name back into its path form
//!
//! # Design Decisions
//! - No regex: the grammar is a single linear scan
//! - Word characters are ASCII only (`[A-Za-z0-9_]`)

use std::fmt;

use crate::routing::error::SetupError;

/// Separator between namespace components in qualified type names.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Characters accepted as the path splitter.
pub const ALLOWED_SPLITTERS: &str = ".- /";

/// The character separating type-path components inside a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter(char);

impl Splitter {
    /// Validate a splitter given as a string.
    ///
    /// Accepted only if it is exactly one character drawn from [`ALLOWED_SPLITTERS`].
    pub fn parse(value: &str) -> Result<Self, SetupError> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ALLOWED_SPLITTERS.contains(c) => Ok(Self(c)),
            _ => Err(SetupError::InvalidSplitter(value.to_string())),
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }

    /// True for `/`, which switches discovery to the incremental search.
    pub fn is_slash(&self) -> bool {
        self.0 == '/'
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self('.')
    }
}

impl fmt::Display for Splitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip leading and trailing `/` from a raw path.
pub fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Shorthand for [`Splitter::parse`].
pub fn validate_splitter(value: &str) -> Result<Splitter, SetupError> {
    Splitter::parse(value)
}

pub(crate) fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True if `name` is one or more word-character runs joined by `::`.
pub fn is_qualified_identifier(name: &str) -> bool {
    name.split(NAMESPACE_SEPARATOR)
        .all(|part| !part.is_empty() && part.chars().all(is_word))
}

/// Join a non-empty relative name onto the main namespace.
pub fn qualify(main_namespace: &str, relative: &str) -> String {
    if main_namespace.is_empty() {
        relative.to_string()
    } else {
        format!("{main_namespace}{NAMESPACE_SEPARATOR}{relative}")
    }
}

/// Path form of a qualified type name, relative to the main namespace.
///
/// `App::foo::bar` under `App` with splitter `.` becomes `foo.bar`.
pub fn class_to_path(main_namespace: &str, class: &str, splitter: Splitter) -> String {
    let relative = class
        .strip_prefix(main_namespace)
        .filter(|rest| rest.is_empty() || rest.starts_with(NAMESPACE_SEPARATOR))
        .unwrap_or(class);
    let sep = splitter.as_char().to_string();
    relative
        .replace(NAMESPACE_SEPARATOR, &sep)
        .trim_start_matches(splitter.as_char())
        .to_string()
}
