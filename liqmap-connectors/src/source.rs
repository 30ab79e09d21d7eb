//! Trade source port.
//!
//! The port defines how raw recent-trades payloads are obtained.
//! Adapters implement it for real HTTP (`RestTradeSource`) or canned data
//! (`StubTradeSource`).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use liqmap_domain::TradeBatch;

use crate::exchange::ExchangeEndpoint;
use crate::normalize::NormalizeError;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur while fetching a payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, DNS, TLS)
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Exchange answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Body is not valid JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

/// Fetch or normalization failure for one exchange.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// Payload could not be fetched
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Payload could not be normalized
    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

// =============================================================================
// Trade Source Port
// =============================================================================

/// Port for obtaining recent trades from an exchange.
///
/// Implementations:
/// - `RestTradeSource` - HTTP GET with a per-request timeout
/// - `StubTradeSource` - canned payloads and failures for tests
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetch the raw JSON body for one endpoint.
    ///
    /// Timeouts and non-2xx statuses are errors.
    async fn fetch_trades(&self, endpoint: &ExchangeEndpoint) -> Result<Value, FetchError>;

    /// Fetch and normalize one endpoint into a batch.
    async fn fetch_batch(&self, endpoint: &ExchangeEndpoint) -> Result<TradeBatch, SourceError> {
        let payload = self.fetch_trades(endpoint).await?;
        Ok(endpoint.exchange.normalize(payload)?)
    }
}
