//! Service registry: the single source of truth for logical service names.
//!
//! # Design Decisions
//! - Built once from validated config, immutable at runtime
//! - Re-registration requires process restart; hot reload is out of scope
//! - URL parsing here fails startup, never a request

use std::collections::BTreeMap;

use url::Url;

use crate::config::ServiceConfig;

/// One registered upstream service.
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    /// Logical alias clients use in request paths.
    pub name: String,

    /// Absolute base URL of the upstream.
    pub base_url: Url,

    /// Client-facing path prefix this service owns.
    pub route_prefix: String,

    /// Prefix prepended before the remainder when forwarding.
    pub upstream_prefix: String,
}

/// Registry construction failure. Surfacing this aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("service '{service}' has invalid URL '{url}': {source}")]
    InvalidUrl {
        service: String,
        url: String,
        source: url::ParseError,
    },
}

/// Immutable name → upstream mapping shared by every request path.
#[derive(Debug)]
pub struct ServiceRegistry {
    entries: Vec<ServiceEntry>,
}

impl ServiceRegistry {
    /// Build the registry from configuration, failing fast on any
    /// malformed base URL.
    pub fn from_config(services: &[ServiceConfig]) -> Result<Self, RegistryError> {
        let mut entries = Vec::with_capacity(services.len());
        for svc in services {
            let base_url = Url::parse(&svc.url).map_err(|source| RegistryError::InvalidUrl {
                service: svc.name.clone(),
                url: svc.url.clone(),
                source,
            })?;
            entries.push(ServiceEntry {
                name: svc.name.clone(),
                base_url,
                route_prefix: svc.route_prefix(),
                upstream_prefix: svc.upstream_prefix(),
            });
        }
        Ok(Self { entries })
    }

    /// Look up a service by its logical name.
    pub fn resolve(&self, name: &str) -> Option<&ServiceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name → URL map, as exposed by the gateway's own health endpoint.
    pub fn service_urls(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.base_url.to_string()))
            .collect()
    }
}
