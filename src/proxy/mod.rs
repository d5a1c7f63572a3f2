//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! dispatched request (service, remainder)
//!     → forwarder.rs (resolve upstream, build target URL)
//!     → headers.rs (strip Host + hop-by-hop, outbound)
//!     → single upstream call (no redirects, no retries, bounded timeout)
//!     → headers.rs (strip hop-by-hop, response)
//!     → UpstreamResponse or ForwardError
//! ```
//!
//! # Design Decisions
//! - Upstream HTTP errors (4xx/5xx) are relayed, never reinterpreted
//! - Transport failures collapse to one stable client contract (503)
//! - Exactly one outbound call per invocation; a transient failure
//!   surfaces immediately instead of being masked by retries

pub mod forwarder;
pub mod headers;

pub use forwarder::{ForwardError, InboundRequest, ProxyForwarder, UpstreamResponse};
pub use headers::filter_headers;
