//! Naebak API Gateway Library
//!
//! Central gateway for a set of upstream microservices: routes client
//! requests by path prefix, forwards them with proxy-correct header
//! handling, and aggregates upstream health.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod registry;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
