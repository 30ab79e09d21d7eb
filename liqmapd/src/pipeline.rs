//! Pipeline: fetch all → normalize → aggregate.
//!
//! One cycle queries every endpoint of the [`ExchangeTable`] concurrently,
//! waits for all attempts, drops the exchanges that failed, and aggregates
//! whatever is left.
//!
//! # Failure Isolation
//!
//! ```text
//! binance ──fetch+normalize──► Ok(batch) ──┐
//! bybit   ──fetch+normalize──► Err (warn) ─┼──► barrier ──► aggregate ──► HeatmapResult | NoData
//! okx     ──fetch+normalize──► Ok(batch) ──┘
//! ```
//!
//! A per-exchange error is logged and never propagated. Only "nothing usable
//! at all" escalates, as [`PipelineError::NoData`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use liqmap_connectors::{
    Exchange, ExchangeEndpoint, ExchangeTable, FetchError, RestTradeSource, SourceError,
    TradeSource,
};
use liqmap_domain::{HeatmapResult, TradeBatch};
use liqmap_engine::Heatmap;

use crate::error::{PipelineError, PipelineResult};

// =============================================================================
// Pipeline
// =============================================================================

/// Immutable pipeline shared by the scheduler and the API.
pub struct Pipeline {
    /// Endpoints polled each cycle
    table: ExchangeTable,
    /// Where raw payloads come from
    source: Arc<dyn TradeSource>,
    /// Upper bound for one exchange's fetch + normalize
    fetch_timeout: Duration,
}

impl Pipeline {
    /// Create a pipeline over an explicit table and source.
    pub fn new(table: ExchangeTable, source: Arc<dyn TradeSource>, fetch_timeout: Duration) -> Self {
        Self {
            table,
            source,
            fetch_timeout,
        }
    }

    /// Pipeline querying the table's endpoints over HTTP.
    pub fn live(table: ExchangeTable, fetch_timeout: Duration) -> Self {
        Self::new(
            table,
            Arc::new(RestTradeSource::new(fetch_timeout)),
            fetch_timeout,
        )
    }

    /// Configured endpoints.
    pub fn table(&self) -> &ExchangeTable {
        &self.table
    }

    /// Run one full cycle.
    ///
    /// # Errors
    ///
    /// `PipelineError::NoData` when every exchange failed or no trade exceeded
    /// the liquidation size threshold.
    pub async fn run(&self) -> PipelineResult<HeatmapResult> {
        let batches = self.collect_batches().await;

        let heatmap =
            Heatmap::build(batches.iter().map(|(_, batch)| batch)).ok_or(PipelineError::NoData)?;
        let result = heatmap.top_levels();

        debug!(
            exchanges = batches.len(),
            levels = heatmap.len(),
            long_liq = result.long_liq,
            short_liq = result.short_liq,
            "Heatmap aggregated"
        );

        Ok(result)
    }

    /// Fetch and normalize every endpoint, keeping only the successes.
    ///
    /// Returns after all attempts have finished.
    pub async fn collect_batches(&self) -> Vec<(Exchange, TradeBatch)> {
        let attempts = self
            .table
            .endpoints()
            .iter()
            .map(|endpoint| async move { (endpoint.exchange, self.fetch_one(endpoint).await) });

        let mut batches = Vec::with_capacity(self.table.len());
        for (exchange, outcome) in join_all(attempts).await {
            match outcome {
                Ok(batch) => {
                    debug!(%exchange, trades = batch.len(), "Exchange contributed trades");
                    batches.push((exchange, batch));
                }
                Err(e) => {
                    warn!(%exchange, error = %e, "Exchange dropped from cycle");
                }
            }
        }

        batches
    }

    async fn fetch_one(&self, endpoint: &ExchangeEndpoint) -> Result<TradeBatch, SourceError> {
        timeout(self.fetch_timeout, self.source.fetch_batch(endpoint))
            .await
            .map_err(|_| SourceError::Fetch(FetchError::Timeout))?
    }
}

// =============================================================================
// Tests
// =============================================================================
