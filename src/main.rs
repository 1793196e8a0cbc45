//! Sample server for the timing middleware.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ TraceLayer ─▶ TimeoutLayer ─▶ PerfLayer ─┼─▶ application
//!                             │                                   │        │
//!     Client Response         │                         stop timer│        │
//!     ◀───────────────────────┼───────────────────────────────────┘        │
//!                             │                                   │        │
//!                             │          routing (RouteTable) ◀───┤        │
//!                             │          normalizer           ◀───┤        │
//!                             │          reporter ──POST──▶ data.perf.sh   │
//!                             └────────────────────────────────────────────┘
//! ```
//!
//! Usage: `perf-middleware [config.toml]` (or `PERF_CONFIG=...`).

use std::path::PathBuf;
use tokio::net::TcpListener;

use perf_middleware::config::{apply_env_overrides, load_config, PerfConfig};
use perf_middleware::observability::{logging, metrics};
use perf_middleware::PerfServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PERF_CONFIG").ok())
        .map(PathBuf::from);

    let mut config = match &config_path {
        Some(path) => load_config(path)?,
        None => PerfConfig::default(),
    };
    apply_env_overrides(&mut config);

    logging::init_logging(&config.observability.log_level);

    tracing::info!("perf-middleware v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = ?config_path,
        bind_address = %config.listener.bind_address,
        endpoint = %config.reporter.endpoint,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.reporter.api_key.is_empty() {
        tracing::warn!("No API key configured; the ingest endpoint will reject timing records");
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = PerfServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
