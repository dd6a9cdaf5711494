//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Dispatch every request through a fresh endpoint router
//! - Reject paths that do not percent-decode to UTF-8 with 404
//! - Apply hot-reloaded router settings
//!
//! # Design Decisions
//! - The endpoint router resolves once, so one is built per request
//! - Router settings live behind ArcSwap; in-flight requests keep their snapshot
//! - Handlers run synchronously inside the request task

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, RouterConfig};
use crate::http::request::{request_id, HttpRequestInfo, RequestUuid};
use crate::http::response::{error_response, route_response};
use crate::observability::metrics;
use crate::routing::{RouteError, RouteErrorKind, Router as EndpointRouter, RouterMode, TypeOracle};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router_config: Arc<ArcSwap<RouterConfig>>,
    pub registry: Arc<dyn TypeOracle>,
}

/// HTTP front end for the endpoint router.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and handlers.
    pub fn new(config: AppConfig, registry: Arc<dyn TypeOracle>) -> Self {
        let state = AppState {
            router_config: Arc::new(ArcSwap::from_pointee(config.router.clone())),
            registry,
        };
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(RequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(req),
                            method = %req.method(),
                            path = %req.uri().path(),
                        )
                    }))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` replace the router settings
    /// for subsequent requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            namespace = %self.config.router.http_namespace,
            splitter = %self.config.router.splitter,
            "HTTP server starting"
        );

        let router_config = self.state.router_config.clone();
        let mut reload_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    update = config_updates.recv() => match update {
                        Some(config) => {
                            router_config.store(Arc::new(config.router));
                            tracing::info!("Router settings reloaded");
                        }
                        None => break,
                    },
                    _ = reload_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await.ok();
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Resolve and invoke the endpoint for one request.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let info = match HttpRequestInfo::from_request(&request) {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!(request_id = %request_id(&request), error = %e, "Undecodable request path");
            let response = error_response(&RouteError::not_found("Class").with_source(e), None);
            metrics::record_request(request.method().as_str(), response.status().as_u16());
            return response;
        }
    };
    let config = state.router_config.load_full();

    tracing::debug!(
        request_id = %request_id(&request),
        method = %info.method,
        path = %info.path,
        "Dispatching request"
    );

    let response = dispatch(&config, state.registry.clone(), &info);
    metrics::record_request(&info.method, response.status().as_u16());
    response
}

/// Build an HTTP router from `config`, resolve `info` and run the handler.
pub fn dispatch(config: &RouterConfig, registry: Arc<dyn TypeOracle>, info: &HttpRequestInfo) -> Response {
    let mut router = match EndpointRouter::from_config(RouterMode::Http, config, registry) {
        Ok(router) => router,
        Err(e) => {
            tracing::error!(error = %e, "Invalid router settings");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid router settings").into_response();
        }
    };

    let route = router
        .prepare(info, None, None)
        .and_then(|()| router.get_route(config.strict_params));

    match route {
        Ok(route) => {
            tracing::debug!(
                ty = %route.type_name(),
                method = %route.method_name(),
                params = route.exec_params().len(),
                "Invoking handler"
            );
            route_response(route.call())
        }
        Err(e) => {
            let allow = match e.kind() {
                RouteErrorKind::MethodNotAllowed => router
                    .name()
                    .and_then(|name| router.list_allowed_verbs_for_action(name)),
                _ => None,
            };
            tracing::debug!(kind = %e.kind(), subject = %e.subject(), "Request not routed");
            error_response(&e, allow.as_deref())
        }
    }
}
