//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use mini_router::config::AppConfig;
use mini_router::http::HttpServer;
use mini_router::lifecycle::Shutdown;
use mini_router::routing::registry::LookupError;
use mini_router::routing::{
    HandlerRegistry, MethodDescriptor, Signature, TypeDescriptor, TypeOracle,
};

/// Handler that renders its name and parameters, e.g. `GET_bar(baz)`.
pub fn echo_method(name: &'static str, signature: Signature) -> MethodDescriptor {
    MethodDescriptor::new(name, signature, move |params| {
        format!("{name}({})", params.join(","))
    })
}

/// Registry built from `types`; panics on invalid fixtures.
pub fn registry(types: Vec<TypeDescriptor>) -> Arc<dyn TypeOracle> {
    let mut registry = HandlerRegistry::new();
    for ty in types {
        registry.register(ty).unwrap();
    }
    Arc::new(registry)
}

/// Oracle wrapper counting existence lookups.
pub struct CountingOracle {
    inner: Arc<dyn TypeOracle>,
    pub lookups: AtomicUsize,
}

impl CountingOracle {
    pub fn new(inner: Arc<dyn TypeOracle>) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TypeOracle for CountingOracle {
    fn exists(&self, qualified_name: &str) -> bool {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(qualified_name)
    }

    fn describe(&self, qualified_name: &str) -> Result<Arc<TypeDescriptor>, LookupError> {
        self.inner.describe(qualified_name)
    }
}

/// Start a server on `addr` and give it time to bind.
pub async fn start_server(
    addr: SocketAddr,
    mut config: AppConfig,
    registry: Arc<dyn TypeOracle>,
) -> (Shutdown, mpsc::UnboundedSender<AppConfig>) {
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, registry);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    (shutdown, config_tx)
}

/// HTTP client without pooling or proxy detection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
