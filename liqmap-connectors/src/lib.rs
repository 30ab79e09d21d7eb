//! liqmap Exchange Connectors
//!
//! Adapters for exchange recent-trades REST APIs.
//! Normalizes exchange-specific payloads to domain types.

#![warn(clippy::all)]

// Public modules
pub mod exchange;
pub mod normalize;
pub mod rest;
pub mod source;
pub mod stub;

// Re-exports
pub use exchange::{
    Exchange, ExchangeEndpoint, ExchangeTable, UnknownExchange, BINANCE_TRADES_URL,
    BYBIT_TRADES_URL, OKX_TRADES_URL,
};
pub use normalize::NormalizeError;
pub use rest::{RestTradeSource, DEFAULT_TIMEOUT_SECS};
pub use source::{FetchError, SourceError, TradeSource};
pub use stub::StubTradeSource;
