//! Supported exchanges and their recent-trades endpoints.
//!
//! The endpoint table is an immutable value built once at startup and handed
//! to the pipeline; nothing here is global.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Binance USD-M futures recent trades (BTCUSDT, 500 records).
pub const BINANCE_TRADES_URL: &str =
    "https://fapi.binance.com/fapi/v1/trades?symbol=BTCUSDT&limit=500";

/// Bybit linear recent trades (BTCUSDT, 500 records).
pub const BYBIT_TRADES_URL: &str =
    "https://api.bybit.com/v5/market/recent-trade?category=linear&symbol=BTCUSDT&limit=500";

/// OKX swap recent trades (BTC-USDT-SWAP, 500 records).
pub const OKX_TRADES_URL: &str =
    "https://www.okx.com/api/v5/market/trades?instId=BTC-USDT-SWAP&limit=500";

// =============================================================================
// Exchange
// =============================================================================

/// Exchange identity. Selects the URL and the payload mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Exchange {
    /// Binance USD-M futures
    Binance,
    /// Bybit v5 linear
    Bybit,
    /// OKX v5 swap
    Okx,
}

impl Exchange {
    /// All supported exchanges, in polling order.
    pub const ALL: [Exchange; 3] = [Exchange::Binance, Exchange::Bybit, Exchange::Okx];

    /// Hardcoded recent-trades URL for this exchange.
    pub fn default_url(&self) -> &'static str {
        match self {
            Exchange::Binance => BINANCE_TRADES_URL,
            Exchange::Bybit => BYBIT_TRADES_URL,
            Exchange::Okx => OKX_TRADES_URL,
        }
    }

    /// Lowercase name used in logs and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Binance => "binance",
            Exchange::Bybit => "bybit",
            Exchange::Okx => "okx",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown exchange name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown exchange: {0}. Expected: binance, bybit, okx")]
pub struct UnknownExchange(pub String);

impl FromStr for Exchange {
    type Err = UnknownExchange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(Exchange::Binance),
            "bybit" => Ok(Exchange::Bybit),
            "okx" => Ok(Exchange::Okx),
            other => Err(UnknownExchange(other.to_string())),
        }
    }
}

// =============================================================================
// Exchange Table
// =============================================================================

/// One exchange and the URL queried for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeEndpoint {
    /// Exchange whose payload mapping applies to the response
    pub exchange: Exchange,
    /// Full GET URL (symbol and limit baked in)
    pub url: String,
}

impl ExchangeEndpoint {
    /// Endpoint with the exchange's hardcoded URL.
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            url: exchange.default_url().to_string(),
        }
    }

    /// Endpoint with a custom URL (tests, mirrors).
    pub fn with_url(exchange: Exchange, url: impl Into<String>) -> Self {
        Self {
            exchange,
            url: url.into(),
        }
    }
}

/// Read-only set of endpoints polled each cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeTable {
    endpoints: Vec<ExchangeEndpoint>,
}

impl ExchangeTable {
    /// Build a table from explicit endpoints.
    pub fn new(endpoints: Vec<ExchangeEndpoint>) -> Self {
        Self { endpoints }
    }

    /// Table restricted to the given exchanges, using their hardcoded URLs.
    pub fn for_exchanges(exchanges: &[Exchange]) -> Self {
        Self::new(exchanges.iter().copied().map(ExchangeEndpoint::new).collect())
    }

    /// Endpoints in polling order.
    pub fn endpoints(&self) -> &[ExchangeEndpoint] {
        &self.endpoints
    }

    /// Number of configured endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether no endpoint is configured.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for ExchangeTable {
    fn default() -> Self {
        Self::for_exchanges(&Exchange::ALL)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_all_exchanges() {
        let table = ExchangeTable::default();

        assert_eq!(table.len(), 3);
        assert_eq!(table.endpoints()[0].url, BINANCE_TRADES_URL);
        assert_eq!(table.endpoints()[1].exchange, Exchange::Bybit);
        assert_eq!(table.endpoints()[2].url, OKX_TRADES_URL);
    }

    #[test]
    fn test_urls_bake_in_symbol_and_limit() {
        for exchange in Exchange::ALL {
            let url = exchange.default_url();
            assert!(url.contains("BTC"), "{} url missing symbol", exchange);
            assert!(url.contains("limit=500"), "{} url missing limit", exchange);
        }
    }

    #[test]
    fn test_exchange_parse_and_display() {
        assert_eq!("binance".parse::<Exchange>().unwrap(), Exchange::Binance);
        assert_eq!(" OKX ".parse::<Exchange>().unwrap(), Exchange::Okx);
        assert_eq!(Exchange::Bybit.to_string(), "bybit");
        assert!("kraken".parse::<Exchange>().is_err());
    }

    #[test]
    fn test_custom_endpoint() {
        let table = ExchangeTable::new(vec![ExchangeEndpoint::with_url(
            Exchange::Okx,
            "http://127.0.0.1:9/okx",
        )]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.endpoints()[0].exchange, Exchange::Okx);
        assert!(!table.is_empty());
    }
}
