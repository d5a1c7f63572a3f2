//! Route lookup: path prefix → owning service.

use crate::registry::ServiceRegistry;

/// A successful dispatch: the owning service and the path remainder to
/// forward (empty or starting with '/').
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub service: &'a str,
    pub remainder: &'a str,
}

/// Maps request paths to logical services by longest configured prefix.
///
/// Built from the registry at startup and immutable afterwards, so it is
/// shared across requests without locking.
#[derive(Debug)]
pub struct RouteDispatcher {
    // (prefix, service), sorted longest prefix first.
    routes: Vec<(String, String)>,
}

impl RouteDispatcher {
    pub fn from_registry(registry: &ServiceRegistry) -> Self {
        let mut routes: Vec<(String, String)> = registry
            .iter()
            .map(|e| (e.route_prefix.clone(), e.name.clone()))
            .collect();
        routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { routes }
    }

    /// Find the longest prefix owning `path`.
    ///
    /// A prefix only matches whole segments: `/api/auth` matches
    /// `/api/auth` and `/api/auth/login` but not `/api/authx`.
    pub fn dispatch<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        for (prefix, service) in &self.routes {
            if let Some(remainder) = strip_segment_prefix(path, prefix) {
                return Some(RouteMatch {
                    service,
                    remainder,
                });
            }
        }
        None
    }
}

fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let remainder = path.strip_prefix(prefix)?;
    if remainder.is_empty() || remainder.starts_with('/') {
        Some(remainder)
    } else {
        None
    }
}
