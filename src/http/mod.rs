//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, gateway endpoints)
//!     → request.rs (x-request-id layer)
//!     → routing (dispatch) → proxy (forward)
//!     → response relayed to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer, StartupError};
