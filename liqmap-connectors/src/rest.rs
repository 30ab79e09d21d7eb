//! REST client for exchange recent-trades endpoints.
//!
//! Public endpoints only: no API key, no signature. Every request is bounded
//! by the configured timeout; a timed-out request is reported as
//! [`FetchError::Timeout`] and never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use crate::exchange::ExchangeEndpoint;
use crate::source::{FetchError, TradeSource};

// =============================================================================
// Constants
// =============================================================================

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Longest error body kept in `FetchError::Status`
const MAX_ERROR_BODY_LEN: usize = 256;

// =============================================================================
// REST Trade Source
// =============================================================================

/// HTTP-backed trade source.
pub struct RestTradeSource {
    /// HTTP client
    client: Client,
    /// Per-request timeout
    timeout: Duration,
}

impl RestTradeSource {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a GET request and return the raw body.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = timeout(self.timeout, response.text())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_LEN),
            });
        }

        Ok(body)
    }
}

impl Default for RestTradeSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl TradeSource for RestTradeSource {
    async fn fetch_trades(&self, endpoint: &ExchangeEndpoint) -> Result<Value, FetchError> {
        debug!(exchange = %endpoint.exchange, url = %endpoint.url, "Fetching recent trades");

        let body = self.get(&endpoint.url).await?;

        serde_json::from_str(&body).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

fn truncate(body: &str, max_len: usize) -> String {
    match body.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Exchange;

    #[test]
    fn test_default_timeout() {
        let source = RestTradeSource::default();

        assert_eq!(source.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(300);

        let truncated = truncate(&body, 10);

        assert_eq!(truncated, "xxxxxxxxxx...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // Nothing listens on the discard port on loopback
        let source = RestTradeSource::new(Duration::from_secs(2));
        let endpoint = ExchangeEndpoint::with_url(Exchange::Binance, "http://127.0.0.1:9/trades");

        assert!(source.fetch_trades(&endpoint).await.is_err());
    }
}
