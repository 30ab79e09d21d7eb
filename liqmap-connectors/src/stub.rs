//! Stub trade source for testing.
//!
//! Serves canned payloads per exchange without making real HTTP calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::exchange::{Exchange, ExchangeEndpoint};
use crate::source::{FetchError, TradeSource};

// =============================================================================
// Stub Trade Source
// =============================================================================

/// Stub trade source.
///
/// Exchanges without a configured response fail with
/// `FetchError::RequestFailed`, like an unreachable host.
#[derive(Debug, Default)]
pub struct StubTradeSource {
    /// Canned response per exchange
    responses: HashMap<Exchange, Result<Value, FetchError>>,
    /// Number of `fetch_trades` calls served
    fetch_count: AtomicUsize,
}

impl StubTradeSource {
    /// Create a stub with no configured exchanges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` for `exchange`.
    pub fn with_payload(mut self, exchange: Exchange, payload: Value) -> Self {
        self.responses.insert(exchange, Ok(payload));
        self
    }

    /// Fail every fetch for `exchange` with `error`.
    pub fn with_failure(mut self, exchange: Exchange, error: FetchError) -> Self {
        self.responses.insert(exchange, Err(error));
        self
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeSource for StubTradeSource {
    async fn fetch_trades(&self, endpoint: &ExchangeEndpoint) -> Result<Value, FetchError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(&endpoint.exchange) {
            Some(response) => response.clone(),
            None => Err(FetchError::RequestFailed(format!(
                "no stub response for {}",
                endpoint.exchange
            ))),
        }
    }
}

// =============================================================================
// Payload Builders
// =============================================================================

/// Minimal Binance payload with one trade.
pub fn binance_payload(price: &str, qty: &str, is_buyer_maker: bool) -> Value {
    json!([{ "price": price, "qty": qty, "isBuyerMaker": is_buyer_maker }])
}

/// Minimal Bybit payload with one trade.
pub fn bybit_payload(price: &str, size: &str, side: &str) -> Value {
    json!({ "retCode": 0, "result": { "list": [{ "price": price, "size": size, "side": side }] } })
}

/// Minimal OKX payload with one trade.
pub fn okx_payload(px: &str, sz: &str, side: &str) -> Value {
    json!({ "code": "0", "data": [{ "px": px, "sz": sz, "side": side }] })
}

// =============================================================================
// Tests
// =============================================================================
