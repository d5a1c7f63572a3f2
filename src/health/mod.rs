//! Upstream health subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/services
//!     → aggregate.rs (fan-out: one probe per registry entry)
//!     → probe.rs (bounded GET against the well-known health path)
//!     → join on all probes
//!     → HealthReport (per-service status + timestamp)
//! ```
//!
//! # Design Decisions
//! - Probes run concurrently; report latency is bounded by the slowest
//!   probe, not the sum
//! - A probe failure is data, never an error to the caller
//! - Reports are recomputed per request, never cached

pub mod aggregate;
pub mod probe;

pub use aggregate::{HealthAggregator, HealthReport};
pub use probe::{HealthProbe, HealthStatus};
