//! Method identifier convention.
//!
//! # Responsibilities
//! - Build the identifier looked up for a verb/action pair (`GET_bar`)
//! - Split a method identifier back into its verb and action
//!
//! # Design Decisions
//! - Verb is one or more ASCII upper-case letters
//! - Action may be empty (`GET_` handles the bare type path)
//! - Identifier comparison is ASCII case-insensitive

use crate::routing::path::is_word;

/// A method identifier split into verb and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParts<'a> {
    pub verb: &'a str,
    pub action: &'a str,
}

/// Identifier looked up for `verb` and `action`.
pub fn method_identifier(verb: &str, action: &str) -> String {
    format!("{verb}_{action}")
}

/// Split `VERB_action` into its parts, or `None` if it is not a route method.
pub fn split_method_name(identifier: &str) -> Option<MethodParts<'_>> {
    let (verb, action) = identifier.split_once('_')?;
    if verb.is_empty() || !verb.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    if !action.chars().all(is_word) {
        return None;
    }
    Some(MethodParts { verb, action })
}

/// True if two method identifiers name the same method.
pub fn identifiers_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
