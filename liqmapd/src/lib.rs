//! liqmap Daemon Library
//!
//! Runtime orchestrator for the liquidation heatmap.
//!
//! # Architecture
//!
//! ```text
//! HeatmapScheduler (every 300s) ─┐
//!                                ├─► Pipeline ─► TradeSource ─► Binance / Bybit / OKX
//! POST /webhook ─────────────────┘       │
//!                                        └─► normalize ─► aggregate ─► HeatmapResult
//! ```
//!
//! # Components
//!
//! - **Daemon**: Main runtime orchestrator
//! - **Pipeline**: One fetch → normalize → aggregate cycle
//! - **Heatmap Scheduler**: Recurring trigger with a cancellation hook
//! - **API**: HTTP endpoints (health, webhook)
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use liqmapd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new(config);
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
pub mod error;
pub mod pipeline;
pub mod scheduler;

// Re-exports for convenience
pub use api::{create_router, ApiState};
pub use config::{ApiConfig, Config, Environment, SchedulerConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult, PipelineError, PipelineResult};
pub use pipeline::Pipeline;
pub use scheduler::HeatmapScheduler;
