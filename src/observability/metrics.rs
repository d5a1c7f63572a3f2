//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, service
//! - `gateway_request_duration_seconds` (histogram): latency by service
//! - `gateway_upstream_health` (gauge): 1=healthy, 0=unhealthy, per service
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exporter is optional; recording without it is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Failure is logged, not
/// fatal: the gateway keeps serving without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "service" => service.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the latest observed health of one upstream.
pub fn record_upstream_health(service: &str, healthy: bool) {
    gauge!(
        "gateway_upstream_health",
        "service" => service.to_string()
    )
    .set(if healthy { 1.0 } else { 0.0 });
}
