//! Naebak API Gateway
//!
//! Single network-facing process that accepts client requests, forwards
//! them to the owning upstream service, and relays responses unmodified
//! except for connection-specific headers.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────┐
//!                    │                API GATEWAY                  │
//!                    │                                             │
//!   Client Request   │  ┌────────┐   ┌──────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ routing  │──▶│  proxy   │──┼──▶ Upstream
//!                    │  │ server │   │dispatcher│   │forwarder │  │    Service
//!                    │  └────────┘   └──────────┘   └──────────┘  │
//!                    │                                             │
//!                    │  ┌───────────────────────────────────────┐  │
//!                    │  │         Cross-Cutting Concerns         │  │
//!                    │  │  ┌────────┐ ┌────────┐ ┌────────────┐  │  │
//!                    │  │  │ config │ │ health │ │observability│ │  │
//!                    │  │  └────────┘ └────────┘ └────────────┘  │  │
//!                    │  └───────────────────────────────────────┘  │
//!                    └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use naebak_gateway::config::load_config;
use naebak_gateway::observability::metrics;
use naebak_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "naebak-gateway")]
#[command(about = "API gateway for the naebak microservices", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults plus environment
    /// overrides are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naebak_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "naebak-gateway starting");

    let config = load_config(cli.config.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.len(),
        forward_timeout_secs = config.timeouts.forward_secs,
        "Configuration loaded"
    );
    for svc in &config.services {
        tracing::info!(
            service = %svc.name,
            url = %svc.url,
            route_prefix = %svc.route_prefix(),
            "Registered upstream service"
        );
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
