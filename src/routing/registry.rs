//! Handler registry: the type oracle consulted during discovery.
//!
//! # Responsibilities
//! - Answer "does this qualified type exist?"
//! - Describe a type: instantiability, supertypes, ordered method table
//! - Check handler signatures once, at registration time
//!
//! # Data Flow
//! ```text
//! startup:  TypeDescriptor[] → HandlerRegistry::register → immutable registry (Arc)
//! request:  resolver → TypeOracle::exists / describe → Arc<TypeDescriptor>
//! ```
//!
//! # Design Decisions
//! - Replaces runtime reflection: everything a handler exposes is declared up front
//! - Type names are case-sensitive, method identifiers are not
//! - Registration order is preserved; route listings depend on it

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::routing::matcher::identifiers_match;
use crate::routing::path::is_qualified_identifier;

/// Callable bound to a route; receives the leftover path segments.
pub type Handler = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// Existence checks and descriptions of candidate handler types.
pub trait TypeOracle: Send + Sync {
    /// True if `qualified_name` designates a registered type.
    fn exists(&self, qualified_name: &str) -> bool;

    /// Describe a type, failing if it does not exist.
    fn describe(&self, qualified_name: &str) -> Result<Arc<TypeDescriptor>, LookupError>;
}

/// Requirement every discovered handler type must satisfy.
pub trait TypeConstraint: Send + Sync + fmt::Debug {
    fn admits(&self, ty: &TypeDescriptor) -> bool;
}

/// Admits types that declare the named supertype or capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supertype(pub String);

impl TypeConstraint for Supertype {
    fn admits(&self, ty: &TypeDescriptor) -> bool {
        ty.has_supertype(&self.0)
    }
}

/// Type lookup failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("type {0} does not exist")]
pub struct LookupError(pub String);

/// Registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type {0} is already registered")]
    DuplicateType(String),

    #[error("{0:?} is not a valid qualified type name")]
    InvalidTypeName(String),

    #[error("method {method} is declared twice on {ty}")]
    DuplicateMethod { ty: String, method: String },

    #[error("invalid signature for {ty}::{method}: {reason}")]
    InvalidSignature {
        ty: String,
        method: String,
        reason: &'static str,
    },
}

/// How a formal parameter binds leftover path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Required,
    Optional,
    Variadic,
}

/// A formal parameter of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
}

/// Ordered formal parameters of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::Required);
        self
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::Optional);
        self
    }

    pub fn variadic(mut self, name: impl Into<String>) -> Self {
        self.push(name, ParamKind::Variadic);
        self
    }

    fn push(&mut self, name: impl Into<String>, kind: ParamKind) {
        self.params.push(Param {
            name: name.into(),
            kind,
        });
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of parameters that must be supplied.
    pub fn required_count(&self) -> usize {
        self.count(ParamKind::Required)
    }

    /// Maximum number of bindable parameters, `None` when variadic.
    pub fn max_count(&self) -> Option<usize> {
        if self.is_variadic() {
            None
        } else {
            Some(self.params.len())
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.count(ParamKind::Variadic) > 0
    }

    fn count(&self, kind: ParamKind) -> usize {
        self.params.iter().filter(|p| p.kind == kind).count()
    }

    /// Required before optional, at most one variadic and only last.
    fn check(&self) -> Result<(), &'static str> {
        let mut seen_optional = false;
        for (i, param) in self.params.iter().enumerate() {
            match param.kind {
                ParamKind::Required if seen_optional => {
                    return Err("required parameter after an optional one");
                }
                ParamKind::Required => {}
                ParamKind::Optional => seen_optional = true,
                ParamKind::Variadic if i + 1 != self.params.len() => {
                    return Err("variadic parameter must be last");
                }
                ParamKind::Variadic => {}
            }
        }
        Ok(())
    }
}

/// A method exposed by a handler type.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    is_public: bool,
    is_static: bool,
    signature: Signature,
    handler: Handler,
}

impl MethodDescriptor {
    /// A public instance method.
    pub fn new<F>(name: impl Into<String>, signature: Signature, handler: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            is_public: true,
            is_static: false,
            signature,
            handler: Arc::new(handler),
        }
    }

    /// Mark the method static.
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark the method non-public.
    pub fn into_private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("is_public", &self.is_public)
            .field("is_static", &self.is_static)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Reflective description of a handler type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    instantiable: bool,
    supertypes: Vec<String>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// An instantiable type with no methods.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            name: qualified_name.into(),
            instantiable: true,
            supertypes: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Mark the type non-instantiable (only static methods are callable).
    pub fn abstract_type(mut self) -> Self {
        self.instantiable = false;
        self
    }

    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_instantiable(&self) -> bool {
        self.instantiable
    }

    pub fn has_supertype(&self, name: &str) -> bool {
        self.supertypes.iter().any(|s| s == name)
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Public methods, in declaration order.
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_public())
    }

    /// Find a method by identifier (ASCII case-insensitive).
    pub fn find_method(&self, identifier: &str) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| identifiers_match(m.name(), identifier))
    }

    fn check(&self) -> Result<(), RegistryError> {
        if !is_qualified_identifier(&self.name) {
            return Err(RegistryError::InvalidTypeName(self.name.clone()));
        }
        for (i, method) in self.methods.iter().enumerate() {
            let duplicate = self.methods[..i]
                .iter()
                .any(|m| identifiers_match(m.name(), method.name()));
            if duplicate {
                return Err(RegistryError::DuplicateMethod {
                    ty: self.name.clone(),
                    method: method.name().to_string(),
                });
            }
            method
                .signature()
                .check()
                .map_err(|reason| RegistryError::InvalidSignature {
                    ty: self.name.clone(),
                    method: method.name().to_string(),
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Startup-time mapping from qualified type names to their descriptors.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type after checking its name, methods, and signatures.
    pub fn register(&mut self, ty: TypeDescriptor) -> Result<(), RegistryError> {
        ty.check()?;
        if self.types.contains_key(ty.name()) {
            return Err(RegistryError::DuplicateType(ty.name().to_string()));
        }
        tracing::debug!(
            ty = %ty.name(),
            methods = ty.methods().len(),
            "Handler type registered"
        );
        self.types.insert(ty.name().to_string(), Arc::new(ty));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeOracle for HandlerRegistry {
    fn exists(&self, qualified_name: &str) -> bool {
        self.types.contains_key(qualified_name)
    }

    fn describe(&self, qualified_name: &str) -> Result<Arc<TypeDescriptor>, LookupError> {
        self.types
            .get(qualified_name)
            .cloned()
            .ok_or_else(|| LookupError(qualified_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &[String]) -> String {
        String::new()
    }

    #[test]
    fn test_signature_counts() {
        let sig = Signature::new().required("a").optional("b");
        assert_eq!(sig.required_count(), 1);
        assert_eq!(sig.max_count(), Some(2));
        assert!(!sig.is_variadic());

        let sig = Signature::new().required("a").variadic("rest");
        assert_eq!(sig.required_count(), 1);
        assert_eq!(sig.max_count(), None);
        assert!(sig.is_variadic());
    }

    #[test]
    fn test_register_and_describe() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                TypeDescriptor::new("App::foo")
                    .supertype("Endpoint")
                    .method(MethodDescriptor::new("GET_", Signature::new(), noop)),
            )
            .unwrap();

        assert!(registry.exists("App::foo"));
        assert!(!registry.exists("App::Foo"));
        let ty = registry.describe("App::foo").unwrap();
        assert!(ty.has_supertype("Endpoint"));
        assert!(ty.find_method("get_").is_some());
        assert_eq!(
            registry.describe("App::bar").unwrap_err(),
            LookupError("App::bar".into())
        );
    }

    #[test]
    fn test_rejects_bad_registrations() {
        let mut registry = HandlerRegistry::new();
        registry.register(TypeDescriptor::new("App::foo")).unwrap();
        assert_eq!(
            registry.register(TypeDescriptor::new("App::foo")),
            Err(RegistryError::DuplicateType("App::foo".into()))
        );
        assert_eq!(
            registry.register(TypeDescriptor::new("App.foo")),
            Err(RegistryError::InvalidTypeName("App.foo".into()))
        );

        let twice = TypeDescriptor::new("App::twice")
            .method(MethodDescriptor::new("GET_a", Signature::new(), noop))
            .method(MethodDescriptor::new("get_A", Signature::new(), noop));
        assert!(matches!(
            registry.register(twice),
            Err(RegistryError::DuplicateMethod { .. })
        ));

        let bad_order = TypeDescriptor::new("App::order").method(MethodDescriptor::new(
            "GET_",
            Signature::new().optional("a").required("b"),
            noop,
        ));
        assert!(matches!(
            registry.register(bad_order),
            Err(RegistryError::InvalidSignature { .. })
        ));

        let bad_variadic = TypeDescriptor::new("App::variadic").method(MethodDescriptor::new(
            "GET_",
            Signature::new().variadic("rest").optional("a"),
            noop,
        ));
        assert!(matches!(
            registry.register(bad_variadic),
            Err(RegistryError::InvalidSignature { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_supertype_constraint() {
        let ty = TypeDescriptor::new("App::foo").supertype("Endpoint");
        assert!(Supertype("Endpoint".into()).admits(&ty));
        assert!(!Supertype("Admin".into()).admits(&ty));
    }
}
