//! Heatmap Scheduler: the recurring background trigger.
//!
//! Runs the pipeline immediately and then once per interval until its
//! cancellation token fires. A "no data" cycle is logged and the loop waits
//! for the next tick; nothing a single cycle does can stop the loop.
//! Cancellation is checked before every tick and also interrupts a cycle
//! that is still waiting on the exchanges.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use liqmap_domain::HeatmapResult;

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::Pipeline;

// =============================================================================
// Scheduler
// =============================================================================

/// Periodically recomputes the heatmap and logs the top zones.
pub struct HeatmapScheduler {
    /// Shared pipeline
    pipeline: Arc<Pipeline>,
    /// Time between cycles
    interval: Duration,
    /// Stops the loop when cancelled
    shutdown_token: CancellationToken,
}

impl HeatmapScheduler {
    /// Create a scheduler. Cancel `shutdown_token` to stop it.
    pub fn new(pipeline: Arc<Pipeline>, interval: Duration, shutdown_token: CancellationToken) -> Self {
        Self {
            pipeline,
            interval,
            shutdown_token,
        }
    }

    /// Token that stops this scheduler.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Start the loop in the background.
    ///
    /// Returns a JoinHandle that resolves once the token is cancelled.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the loop on the current task until cancelled.
    pub async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            exchanges = self.pipeline.table().len(),
            "Heatmap scheduler started"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => {
                    info!("Heatmap scheduler received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = self.shutdown_token.cancelled() => {
                            info!("Heatmap scheduler cancelled mid-cycle");
                            break;
                        }
                        outcome = self.pipeline.run() => {
                            report(&outcome);
                        }
                    }
                }
            }
        }

        info!("Heatmap scheduler stopped");
    }
}

fn report(outcome: &PipelineResult<HeatmapResult>) {
    match outcome {
        Ok(result) => {
            info!(
                long_liq = result.long_liq,
                short_liq = result.short_liq,
                "Top zones"
            );
        }
        Err(PipelineError::NoData) => {
            warn!("No liquidation data this cycle");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
