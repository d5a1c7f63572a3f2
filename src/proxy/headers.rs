//! Header filtering for proxy hops.
//!
//! Hop-by-hop headers describe one network connection, not the logical
//! message, and must not cross the gateway in either direction. `Host`
//! joins the set because the upstream client supplies its own.

use axum::http::header::HeaderName;
use axum::http::HeaderMap;

/// RFC 7230 §6.1 hop-by-hop headers, plus `Host`.
const CONNECTION_SCOPED: [&str; 9] = [
    "connection",
    "host",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Whether a header is scoped to a single connection.
pub fn is_connection_scoped(name: &HeaderName) -> bool {
    CONNECTION_SCOPED.contains(&name.as_str())
}

/// Copy `headers` without connection-scoped entries.
///
/// Order and duplicate occurrences of the surviving headers are
/// preserved. Total function: applied identically to inbound request
/// headers and upstream response headers.
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    // iter() repeats the name for duplicate values, so append keeps them
    for (name, value) in headers.iter() {
        if !is_connection_scoped(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}
