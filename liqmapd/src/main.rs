//! liqmap Daemon
//!
//! Polls Binance, Bybit and OKX recent trades and reports the price levels
//! with the largest approximated liquidation volume.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p liqmapd
//!
//! # Start with custom environment
//! LIQMAP_API_PORT=8081 LIQMAP_POLL_INTERVAL_SECS=60 cargo run -p liqmapd
//!
//! # Trigger a computation on demand
//! curl -X POST http://localhost:5000/webhook
//! ```
//!
//! # Environment Variables
//!
//! - `LIQMAP_ENV`: Environment (test, development, production)
//! - `LIQMAP_API_HOST`: API host (default: 0.0.0.0)
//! - `LIQMAP_API_PORT`: API port (default: 5000)
//! - `LIQMAP_POLL_INTERVAL_SECS`: Scheduled loop period (default: 300)
//! - `LIQMAP_FETCH_TIMEOUT_SECS`: Per-exchange fetch timeout (default: 5)
//! - `LIQMAP_SCHEDULER_ENABLED`: Run the background loop (default: true)
//! - `LIQMAP_EXCHANGES`: Comma-separated exchanges to poll (default: binance,bybit,okx)

use liqmapd::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("liqmapd=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        poll_interval_secs = config.scheduler.poll_interval_secs,
        exchanges = ?config.exchanges,
        "liqmap Daemon"
    );

    // Create and run daemon
    let daemon = Daemon::new(config);
    daemon.run().await?;

    Ok(())
}
