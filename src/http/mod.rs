//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, verb and path for the router)
//!     → [routing layer resolves the handler]
//!     → response.rs (handler output or mapped routing error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HttpRequestInfo, RequestUuid, X_REQUEST_ID};
pub use server::{dispatch, AppState, HttpServer};
