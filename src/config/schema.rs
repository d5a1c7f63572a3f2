//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream service definitions.
    pub services: Vec<ServiceConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream health probe settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: vec![
                ServiceConfig {
                    name: "auth".to_string(),
                    url: "http://localhost:8001".to_string(),
                    route_prefix: None,
                    upstream_prefix: None,
                },
                ServiceConfig {
                    name: "content".to_string(),
                    url: "http://localhost:8002".to_string(),
                    route_prefix: None,
                    upstream_prefix: Some("/api".to_string()),
                },
            ],
            timeouts: TimeoutConfig::default(),
            health_check: HealthCheckConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// One upstream service the gateway proxies to.
///
/// The `name` is the logical alias clients use in request paths;
/// `url` is the upstream's base address. Path rewriting is explicit
/// per service rather than hardcoded: `route_prefix` is matched and
/// stripped on the client side, `upstream_prefix` is prepended on the
/// upstream side. Both default to `/api/{name}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Logical service name (e.g., "auth").
    pub name: String,

    /// Absolute base URL of the upstream (e.g., "http://localhost:8001").
    pub url: String,

    /// Client-facing path prefix this service owns.
    #[serde(default)]
    pub route_prefix: Option<String>,

    /// Path prefix prepended before the remainder when forwarding.
    #[serde(default)]
    pub upstream_prefix: Option<String>,
}

impl ServiceConfig {
    /// Effective client-facing prefix.
    pub fn route_prefix(&self) -> String {
        self.route_prefix
            .clone()
            .unwrap_or_else(|| format!("/api/{}", self.name))
    }

    /// Effective upstream-side prefix.
    pub fn upstream_prefix(&self) -> String {
        self.upstream_prefix
            .clone()
            .unwrap_or_else(|| self.route_prefix())
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request guard (total time budget per client request) in seconds.
    pub request_secs: u64,

    /// Total time budget for one upstream forward in seconds.
    pub forward_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            forward_secs: 5,
            connect_secs: 3,
        }
    }
}

/// Upstream health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Well-known path probed on each upstream.
    pub path: String,

    /// Probe timeout in seconds. Must stay below `timeouts.forward_secs`
    /// since probes run against every service at once.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: "/api/health/".to_string(),
            timeout_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
