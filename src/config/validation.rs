//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check service entries (unique names, absolute http(s) URLs)
//! - Validate value ranges (timeouts > 0, probe below forward budget)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    NoServices,
    EmptyServiceName,
    DuplicateService(String),
    InvalidServiceUrl { service: String, url: String, reason: String },
    InvalidPrefix { service: String, prefix: String },
    ZeroTimeout(&'static str),
    ProbeTimeoutNotBelowForward { probe_secs: u64, forward_secs: u64 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::NoServices => {
                write!(f, "no upstream services configured")
            }
            ValidationError::EmptyServiceName => {
                write!(f, "service with empty name")
            }
            ValidationError::DuplicateService(name) => {
                write!(f, "duplicate service name '{}'", name)
            }
            ValidationError::InvalidServiceUrl { service, url, reason } => {
                write!(f, "service '{}' has invalid URL '{}': {}", service, url, reason)
            }
            ValidationError::InvalidPrefix { service, prefix } => {
                write!(f, "service '{}' has invalid path prefix '{}'", service, prefix)
            }
            ValidationError::ZeroTimeout(which) => {
                write!(f, "timeout '{}' must be greater than zero", which)
            }
            ValidationError::ProbeTimeoutNotBelowForward { probe_secs, forward_secs } => {
                write!(
                    f,
                    "health probe timeout ({}s) must be below the forward timeout ({}s)",
                    probe_secs, forward_secs
                )
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = std::collections::HashSet::new();
    for svc in &config.services {
        if svc.name.is_empty() {
            errors.push(ValidationError::EmptyServiceName);
            continue;
        }
        if !seen.insert(svc.name.clone()) {
            errors.push(ValidationError::DuplicateService(svc.name.clone()));
        }

        match Url::parse(&svc.url) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    errors.push(ValidationError::InvalidServiceUrl {
                        service: svc.name.clone(),
                        url: svc.url.clone(),
                        reason: format!("unsupported scheme '{}'", url.scheme()),
                    });
                } else if url.host_str().is_none() {
                    errors.push(ValidationError::InvalidServiceUrl {
                        service: svc.name.clone(),
                        url: svc.url.clone(),
                        reason: "missing host".to_string(),
                    });
                }
            }
            Err(e) => {
                errors.push(ValidationError::InvalidServiceUrl {
                    service: svc.name.clone(),
                    url: svc.url.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let route_prefix = svc.route_prefix();
        if !route_prefix.starts_with('/') || route_prefix.ends_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                service: svc.name.clone(),
                prefix: route_prefix,
            });
        }
        let upstream_prefix = svc.upstream_prefix();
        if !(upstream_prefix.is_empty() || upstream_prefix.starts_with('/'))
            || upstream_prefix.ends_with('/')
        {
            errors.push(ValidationError::InvalidPrefix {
                service: svc.name.clone(),
                prefix: upstream_prefix,
            });
        }
    }

    if config.timeouts.forward_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.forward_secs"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("health_check.timeout_secs"));
    }
    if config.health_check.timeout_secs >= config.timeouts.forward_secs
        && config.timeouts.forward_secs > 0
    {
        errors.push(ValidationError::ProbeTimeoutNotBelowForward {
            probe_secs: config.health_check.timeout_secs,
            forward_secs: config.timeouts.forward_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ServiceConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.services.push(ServiceConfig {
            name: "auth".into(), // duplicate
            url: "ftp://example.com".into(),
            route_prefix: None,
            upstream_prefix: None,
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidBindAddress("not-an-address".into())));
        assert!(errors.contains(&ValidationError::DuplicateService("auth".into())));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::InvalidServiceUrl { service, .. } if service == "auth"
        )));
    }

    #[test]
    fn rejects_relative_url() {
        let mut config = GatewayConfig::default();
        config.services[0].url = "localhost:8001/api".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_probe_timeout_at_or_above_forward() {
        let mut config = GatewayConfig::default();
        config.health_check.timeout_secs = config.timeouts.forward_secs;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ProbeTimeoutNotBelowForward { .. })));
    }

    #[test]
    fn rejects_bad_prefix() {
        let mut config = GatewayConfig::default();
        config.services[0].route_prefix = Some("api/auth".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPrefix { .. })));
    }
}
