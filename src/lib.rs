//! Convention-based endpoint router.
//!
//! Maps a request verb and path onto a handler method named `VERB_action`
//! on a type found by walking the namespace hierarchy, with no route table.
//!
//! # Architecture Overview
//!
//! ```text
//!     HTTP request ──▶ http::server ─┐
//!                                    ├──▶ routing::Router ──▶ Route::call ──▶ output
//!     CLI argv ──────▶ cli ──────────┘         │
//!                                              ▼
//!                                    routing::HandlerRegistry
//!                                    (endpoints registered at startup)
//!
//!     Cross-cutting: config (TOML, hot reload), observability (tracing,
//!     metrics), lifecycle (signals, shutdown)
//! ```

// Core subsystems
pub mod config;
pub mod routing;

// Entrypoints
pub mod cli;
pub mod endpoints;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{HandlerRegistry, Route, RouteError, RouteErrorKind, Router, RouterMode};
