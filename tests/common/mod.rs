//! Shared utilities for integration testing.
//!
//! Mock upstreams are real axum servers on ephemeral ports so tests can
//! inspect exactly what the gateway forwarded (method, path, query,
//! headers) and respond with crafted statuses and delays.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use naebak_gateway::config::ServiceConfig;
use naebak_gateway::{GatewayConfig, HttpServer, Shutdown};

/// Serve `router` as a mock upstream on an ephemeral port.
pub async fn start_mock_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address that accepts connections but never answers them.
#[allow(dead_code)]
pub async fn start_black_hole() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => held.push(socket),
                Err(_) => break,
            }
        }
    });
    addr
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Service entry pointing at a mock upstream, default prefixes.
pub fn service(name: &str, addr: SocketAddr) -> ServiceConfig {
    ServiceConfig {
        name: name.to_string(),
        url: format!("http://{}", addr),
        route_prefix: None,
        upstream_prefix: None,
    }
}

/// Gateway config with the given services and no metrics exporter.
pub fn gateway_config(services: Vec<ServiceConfig>) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.services = services;
    config.observability.metrics_enabled = false;
    config
}

/// Spawn the gateway on an ephemeral port.
///
/// The returned `Shutdown` must be kept alive for the duration of the
/// test: dropping it closes the broadcast channel and stops the server.
pub async fn spawn_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

/// Client that mirrors what the gateway's tests need: no proxying, no
/// redirect following (so relayed 3xx responses stay observable).
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
