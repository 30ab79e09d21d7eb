//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together all components:
//! - Pipeline (fetch → normalize → aggregate)
//! - Heatmap Scheduler (recurring trigger)
//! - API Server (on-demand trigger)
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Build the pipeline over the static exchange table
//! 3. Start API server
//! 4. Start the scheduler (if enabled)
//! 5. Wait for SIGINT or an explicit shutdown request
//! 6. Cancel the token, drain the server and the scheduler

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::pipeline::Pipeline;
use crate::scheduler::HeatmapScheduler;

// =============================================================================
// Daemon
// =============================================================================

/// The main liqmap daemon.
pub struct Daemon {
    /// Configuration
    config: Config,
    /// Pipeline shared by the API and the scheduler
    pipeline: Arc<Pipeline>,
    /// Cancelled on shutdown; parent of every background task's token
    shutdown_token: CancellationToken,
}

impl Daemon {
    /// Create a daemon polling the live exchanges.
    pub fn new(config: Config) -> Self {
        let pipeline = Arc::new(Pipeline::live(
            config.exchange_table(),
            config.scheduler.fetch_timeout(),
        ));
        Self::with_pipeline(config, pipeline)
    }

    /// Create a daemon with a provided pipeline.
    pub fn with_pipeline(config: Config, pipeline: Arc<Pipeline>) -> Self {
        Self {
            config,
            pipeline,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token that stops the daemon when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT or token).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            exchanges = self.pipeline.table().len(),
            "Starting liqmap daemon"
        );

        // 1. Start API server
        let api_addr = self.start_api_server().await?;
        info!(%api_addr, "API server started");

        // 2. Start scheduler
        let scheduler = if self.config.scheduler.enabled {
            let scheduler = HeatmapScheduler::new(
                self.pipeline.clone(),
                self.config.scheduler.poll_interval(),
                self.shutdown_token.child_token(),
            );
            Some(scheduler.start())
        } else {
            info!("Heatmap scheduler disabled");
            None
        };

        // 3. Wait for shutdown
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
            }
            _ = self.shutdown_token.cancelled() => {
                info!("Shutdown requested");
            }
        }

        // 4. Graceful shutdown
        self.shutdown_token.cancel();
        if let Some(handle) = scheduler {
            handle
                .await
                .map_err(|e| DaemonError::Task(format!("Scheduler task failed: {}", e)))?;
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// Start the API server.
    async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let state = Arc::new(ApiState {
            pipeline: self.pipeline.clone(),
        });

        let router = create_router(state);
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            DaemonError::Server(format!("Failed to bind to {}: {}", addr, e))
        })?;

        let local_addr = listener.local_addr().map_err(|e| {
            DaemonError::Server(format!("Failed to get local address: {}", e))
        })?;

        // Spawn the server task
        let shutdown = self.shutdown_token.child_token();
        tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }
}

// =============================================================================
// Tests
// =============================================================================
