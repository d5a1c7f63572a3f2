//! Single-service health probing.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde::{Serialize, Serializer};

use crate::config::HealthCheckConfig;
use crate::registry::ServiceEntry;

/// Observed health of one upstream service.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    #[serde(skip)]
    pub name: String,

    pub url: String,

    /// Serialized as `"status": "healthy" | "unhealthy"`.
    #[serde(rename = "status", serialize_with = "status_label")]
    pub healthy: bool,

    /// Observed probe latency in seconds, measured for failures too.
    pub response_time: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn status_label<S: Serializer>(healthy: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *healthy { "healthy" } else { "unhealthy" })
}

/// Issues one bounded-timeout health check against one service.
///
/// The timeout is deliberately shorter than the forwarding timeout:
/// probes run against every registered service at once and one slow
/// upstream must not stall the whole report.
pub struct HealthProbe {
    client: reqwest::Client,
    path: String,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(config: &HealthCheckConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            path: config.path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Probe one service. Always returns; failure is carried as data.
    /// Healthy means exactly HTTP 200.
    pub async fn probe(&self, entry: &ServiceEntry) -> HealthStatus {
        let url = format!(
            "{}{}",
            entry.base_url.as_str().trim_end_matches('/'),
            self.path
        );
        let start = Instant::now();

        let (healthy, error) = match self.client.get(url.as_str()).timeout(self.timeout).send().await {
            Ok(response) if response.status() == StatusCode::OK => (true, None),
            Ok(response) => (false, Some(format!("status {}", response.status().as_u16()))),
            Err(e) if e.is_timeout() => (false, Some("timeout".to_string())),
            Err(e) => (false, Some(e.to_string())),
        };
        let response_time = start.elapsed().as_secs_f64();

        if let Some(detail) = &error {
            tracing::warn!(
                service = %entry.name,
                url = %url,
                error = %detail,
                "Health probe failed"
            );
        }

        HealthStatus {
            name: entry.name.clone(),
            url: entry.base_url.to_string(),
            healthy,
            response_time,
            error,
        }
    }
}
