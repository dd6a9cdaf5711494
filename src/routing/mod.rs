//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (verb, path) or CLI invocation (path)
//!     → router.rs (mode checks, default path, write-once state)
//!     → reroute.rs (optional verb/path rewrite)
//!     → resolver.rs (type + action discovery against the registry)
//!     → validator.rs (whitelist, callability, metadata cross-check, arity)
//!     → Return: Route bound to leftover segments, or RouteError
//!
//! Handler registration (at startup):
//!     TypeDescriptor[]
//!     → registry.rs (name grammar, duplicate and signature checks)
//!     → Freeze as immutable HandlerRegistry behind Arc
//! ```
//!
//! # Design Decisions
//! - No route table: paths map onto the namespace hierarchy by convention
//! - Handler methods are named `VERB_action`
//! - Deterministic: same registry and input always resolve the same way
//! - A Router instance resolves once; build one per request

pub mod describe;
pub mod error;
pub mod matcher;
pub mod path;
pub mod registry;
pub mod reroute;
pub mod resolver;
pub mod route;
pub mod router;
pub mod source;
pub mod validator;

pub use describe::{describe_handler, RouteInfo};
pub use error::{RouteError, RouteErrorKind, RouteResult, SetupError};
pub use path::Splitter;
pub use registry::{
    HandlerRegistry, MethodDescriptor, RegistryError, Signature, Supertype, TypeConstraint,
    TypeDescriptor, TypeOracle,
};
pub use reroute::{RerouteHook, RerouteRule, RerouteTable};
pub use route::Route;
pub use router::{RouteListing, Router, RouterMode, CLI_VERB};
pub use source::RequestSource;
