//! HTTP server setup and gateway endpoints.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, CORS)
//! - Dispatch `/api/{service}/...` requests to the forwarder
//! - Expose `/`, `/health`, and `/api/services`
//! - Map forwarding failures to the stable client contract (404/503)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::health::{HealthAggregator, HealthProbe};
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::proxy::{ForwardError, InboundRequest, ProxyForwarder};
use crate::registry::{RegistryError, ServiceRegistry};
use crate::routing::RouteDispatcher;

/// Largest request body the gateway buffers for forwarding.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub dispatcher: Arc<RouteDispatcher>,
    pub forwarder: Arc<ProxyForwarder>,
    pub aggregator: Arc<HealthAggregator>,
}

/// Startup failure while assembling the gateway from config.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the API gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the gateway from a validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let registry = Arc::new(ServiceRegistry::from_config(&config.services)?);
        let dispatcher = Arc::new(RouteDispatcher::from_registry(&registry));
        let forwarder = Arc::new(ProxyForwarder::new(registry.clone(), &config.timeouts)?);
        let aggregator = Arc::new(HealthAggregator::new(HealthProbe::new(
            &config.health_check,
        )?));

        let state = AppState {
            registry,
            dispatcher,
            forwarder,
            aggregator,
        };

        Ok(Self {
            router: Self::build_router(&config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/api/services", get(list_services_handler))
            .route("/api/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: dispatch by path prefix, forward, relay.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let method = request.method().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    let (service, remainder) = match state.dispatcher.dispatch(&path) {
        Some(route) => (route.service.to_string(), route.remainder.to_string()),
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No service owns path");
            metrics::record_request(&method, 404, "none", start_time);
            return error_response(StatusCode::NOT_FOUND, "Unknown service");
        }
    };

    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer request body");
            metrics::record_request(&method, 413, &service, start_time);
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
    };

    let inbound = InboundRequest {
        method: parts.method,
        headers: parts.headers,
        query,
        body: body_bytes,
    };

    match state.forwarder.forward(&service, &remainder, inbound).await {
        Ok(upstream) => {
            metrics::record_request(&method, upstream.status.as_u16(), &service, start_time);

            let mut response = Response::new(Body::from(upstream.body));
            *response.status_mut() = upstream.status;
            *response.headers_mut() = upstream.headers;
            response
        }
        Err(ForwardError::UnknownService(name)) => {
            // Dispatcher and registry are built from the same config, so
            // this only fires if they ever disagree.
            tracing::warn!(request_id = %request_id, service = %name, "Service not in registry");
            metrics::record_request(&method, 404, &service, start_time);
            error_response(StatusCode::NOT_FOUND, "Unknown service")
        }
        Err(ForwardError::Unavailable(detail)) => {
            tracing::error!(
                request_id = %request_id,
                service = %service,
                path = %path,
                error = %detail,
                "Error proxying to upstream"
            );
            metrics::record_request(&method, 503, &service, start_time);
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
        }
    }
}

/// `GET /health`: gateway liveness only, no upstream calls.
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "services": state.registry.service_urls(),
    }))
}

/// `GET /api/services`: aggregated upstream health, recomputed per call.
async fn list_services_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let report = state.aggregator.aggregate(&state.registry).await;
    Json(json!({
        "gateway": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "services": report.services,
        "timestamp": report.generated_at.to_rfc3339(),
    }))
}

/// `GET /`: static capability listing.
async fn root_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut endpoints = serde_json::Map::new();
    endpoints.insert(
        "/health".to_string(),
        json!("Gateway health check"),
    );
    endpoints.insert(
        "/api/services".to_string(),
        json!("List all services"),
    );
    for entry in state.registry.iter() {
        endpoints.insert(
            format!("{}/*", entry.route_prefix),
            json!(format!("Proxy to {} service", entry.name)),
        );
    }

    Json(json!({
        "message": "Naebak API Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
