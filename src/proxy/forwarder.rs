//! Upstream request forwarding.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};

use crate::config::TimeoutConfig;
use crate::proxy::headers::filter_headers;
use crate::registry::{ServiceEntry, ServiceRegistry};

/// The parts of an inbound request the forwarder needs. Owned by a
/// single request handling pass and never retained.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Raw query string, passed through verbatim (presence and order).
    pub query: Option<String>,
    pub body: Bytes,
}

/// A completed transport exchange with an upstream. Any HTTP status,
/// including 4xx/5xx, lands here: upstream application errors are not
/// gateway errors.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Classified forwarding failure.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Routing miss: the name is not in the registry. Client-caused,
    /// maps to a 404-class response.
    #[error("unknown service '{0}'")]
    UnknownService(String),

    /// Transport failure or timeout reaching the upstream. Maps to 503.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

/// Forwards one inbound request to the upstream owning it.
///
/// Holds the shared registry and a pre-built client configured with the
/// forward/connect timeouts and redirect following disabled: a 3xx from
/// upstream is relayed as-is with its `Location` header so the client
/// makes the redirect decision, not the gateway.
pub struct ProxyForwarder {
    registry: Arc<ServiceRegistry>,
    client: reqwest::Client,
}

impl ProxyForwarder {
    pub fn new(registry: Arc<ServiceRegistry>, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(timeouts.forward_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()?;
        Ok(Self { registry, client })
    }

    /// Forward `inbound` to `service`, appending `remainder` to the
    /// service's upstream prefix. Exactly one outbound call, no retries.
    pub async fn forward(
        &self,
        service: &str,
        remainder: &str,
        inbound: InboundRequest,
    ) -> Result<UpstreamResponse, ForwardError> {
        let entry = self
            .registry
            .resolve(service)
            .ok_or_else(|| ForwardError::UnknownService(service.to_string()))?;

        let target = target_url(entry, remainder, inbound.query.as_deref());
        let headers = filter_headers(&inbound.headers);

        let response = self
            .client
            .request(inbound.method, target.as_str())
            .headers(headers)
            .body(inbound.body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let headers = filter_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(classify_transport_error)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify_transport_error(err: reqwest::Error) -> ForwardError {
    if err.is_timeout() {
        ForwardError::Unavailable("timeout".to_string())
    } else {
        ForwardError::Unavailable(err.to_string())
    }
}

/// `base_url + upstream_prefix + remainder`, query passed through verbatim.
fn target_url(entry: &ServiceEntry, remainder: &str, query: Option<&str>) -> String {
    let base = entry.base_url.as_str().trim_end_matches('/');
    let mut target = format!("{}{}{}", base, entry.upstream_prefix, remainder);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}
