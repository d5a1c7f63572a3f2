//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → dispatcher.rs (longest-prefix lookup)
//!     → Return: (service, remainder) or explicit no-match
//!
//! Route compilation (at startup):
//!     ServiceRegistry entries
//!     → Sort prefixes longest-first
//!     → Freeze as immutable RouteDispatcher
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Prefixes match whole path segments, never partial ones
//! - Explicit no-match rather than silent default; the HTTP boundary
//!   turns it into a 404

pub mod dispatcher;

pub use dispatcher::{RouteDispatcher, RouteMatch};
