//! Fan-out/fan-in health aggregation across the registry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;

use crate::health::probe::{HealthProbe, HealthStatus};
use crate::observability::metrics;
use crate::registry::ServiceRegistry;

/// Combined health view over every registered service.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub services: BTreeMap<String, HealthStatus>,
    pub generated_at: DateTime<Utc>,
}

/// Runs one probe per registry entry concurrently and assembles the
/// combined report.
pub struct HealthAggregator {
    probe: HealthProbe,
}

impl HealthAggregator {
    pub fn new(probe: HealthProbe) -> Self {
        Self { probe }
    }

    /// Probe every service at once and join on all results.
    ///
    /// Total latency is bounded by the slowest probe, not the sum; each
    /// entry is independent and a failing service never short-circuits
    /// the rest.
    pub async fn aggregate(&self, registry: &ServiceRegistry) -> HealthReport {
        let probes = registry.iter().map(|entry| self.probe.probe(entry));
        let statuses = join_all(probes).await;

        let mut services = BTreeMap::new();
        for status in statuses {
            metrics::record_upstream_health(&status.name, status.healthy);
            services.insert(status.name.clone(), status);
        }

        HealthReport {
            services,
            generated_at: Utc::now(),
        }
    }
}
