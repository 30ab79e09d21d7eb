//! Trade Normalizer
//!
//! Maps each exchange's recent-trades payload into a [`TradeBatch`].
//!
//! | Exchange | Envelope            | price   | size  | side                          |
//! |----------|---------------------|---------|-------|-------------------------------|
//! | Binance  | top-level array     | `price` | `qty` | `isBuyerMaker` true → sell    |
//! | Bybit    | `result.list[]`     | `price` | `size`| `side` label                  |
//! | OKX      | `data[]`            | `px`    | `sz`  | `side` label                  |
//!
//! Numbers arrive as JSON strings on all three venues; plain JSON numbers are
//! accepted too. One bad record fails the whole batch.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use liqmap_domain::{DomainError, NormalizedTrade, TradeBatch, TradeSide};

use crate::exchange::Exchange;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur while normalizing a payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Payload does not have the exchange's expected shape
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// Numeric field is not a number
    #[error("Invalid number in field '{field}': {value}")]
    InvalidNumber {
        /// Source field name
        field: &'static str,
        /// Raw value
        value: String,
    },

    /// Side label is neither buy nor sell
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    /// Parsed values violate trade invariants
    #[error("Invalid trade: {0}")]
    InvalidTrade(DomainError),
}

impl From<DomainError> for NormalizeError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidSide(label) => NormalizeError::InvalidSide(label),
            other => NormalizeError::InvalidTrade(other),
        }
    }
}

// =============================================================================
// Normalizer
// =============================================================================

impl Exchange {
    /// Normalize a parsed recent-trades response for this exchange.
    ///
    /// The output keeps one record per input trade; no filtering happens here.
    ///
    /// # Errors
    ///
    /// Any shape mismatch, unparsable number or unknown side label fails the
    /// entire batch.
    pub fn normalize(&self, payload: Value) -> Result<TradeBatch, NormalizeError> {
        match self {
            Exchange::Binance => {
                let trades: Vec<BinanceTrade> = decode(payload)?;
                trades.iter().map(BinanceTrade::to_trade).collect()
            }
            Exchange::Bybit => {
                let response: BybitResponse = decode(payload)?;
                response.result.list.iter().map(BybitTrade::to_trade).collect()
            }
            Exchange::Okx => {
                let response: OkxResponse = decode(payload)?;
                response.data.iter().map(OkxTrade::to_trade).collect()
            }
        }
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, NormalizeError> {
    serde_json::from_value(payload).map_err(|e| NormalizeError::Payload(e.to_string()))
}

// =============================================================================
// Payload Types
// =============================================================================

/// Numeric field sent either as a string or as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumericField {
    Text(String),
    Number(f64),
}

impl NumericField {
    fn parse(&self, field: &'static str) -> Result<f64, NormalizeError> {
        match self {
            NumericField::Number(n) => Ok(*n),
            NumericField::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                NormalizeError::InvalidNumber {
                    field,
                    value: s.clone(),
                }
            }),
        }
    }
}

/// Binance `GET /fapi/v1/trades` element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTrade {
    price: NumericField,
    qty: NumericField,
    is_buyer_maker: bool,
}

impl BinanceTrade {
    fn to_trade(&self) -> Result<NormalizedTrade, NormalizeError> {
        Ok(NormalizedTrade::new(
            self.price.parse("price")?,
            self.qty.parse("qty")?,
            TradeSide::from_buyer_maker(self.is_buyer_maker),
        )?)
    }
}

/// Bybit `GET /v5/market/recent-trade` response.
#[derive(Debug, Clone, Deserialize)]
struct BybitResponse {
    result: BybitResult,
}

#[derive(Debug, Clone, Deserialize)]
struct BybitResult {
    list: Vec<BybitTrade>,
}

#[derive(Debug, Clone, Deserialize)]
struct BybitTrade {
    price: NumericField,
    size: NumericField,
    side: String,
}

impl BybitTrade {
    fn to_trade(&self) -> Result<NormalizedTrade, NormalizeError> {
        Ok(NormalizedTrade::new(
            self.price.parse("price")?,
            self.size.parse("size")?,
            self.side.parse::<TradeSide>()?,
        )?)
    }
}

/// OKX `GET /api/v5/market/trades` response.
#[derive(Debug, Clone, Deserialize)]
struct OkxResponse {
    data: Vec<OkxTrade>,
}

#[derive(Debug, Clone, Deserialize)]
struct OkxTrade {
    px: NumericField,
    sz: NumericField,
    side: String,
}

impl OkxTrade {
    fn to_trade(&self) -> Result<NormalizedTrade, NormalizeError> {
        Ok(NormalizedTrade::new(
            self.px.parse("px")?,
            self.sz.parse("sz")?,
            self.side.parse::<TradeSide>()?,
        )?)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_binance_maps_maker_flag_to_side() {
        let payload = json!([
            {"id": 1, "price": "95012.30", "qty": "0.250", "quoteQty": "23753.07",
             "time": 1700000000000u64, "isBuyerMaker": true},
            {"id": 2, "price": "95013.10", "qty": "0.004", "quoteQty": "380.05",
             "time": 1700000000001u64, "isBuyerMaker": false}
        ]);

        let batch = Exchange::Binance.normalize(payload).unwrap();

        assert_eq!(batch.len(), 2);
        let first = batch.trades()[0];
        assert_eq!(first.price(), 95012.30);
        assert_eq!(first.size(), 0.25);
        assert_eq!(first.side(), TradeSide::Sell);
        assert_eq!(batch.trades()[1].side(), TradeSide::Buy);
    }

    #[test]
    fn test_bybit_passes_side_through() {
        let payload = json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "linear",
                "list": [
                    {"execId": "a", "symbol": "BTCUSDT", "price": "95001.5",
                     "size": "1.2", "side": "Buy", "time": "1700000000000"},
                    {"execId": "b", "symbol": "BTCUSDT", "price": "94999.0",
                     "size": "0.05", "side": "Sell", "time": "1700000000001"}
                ]
            }
        });

        let batch = Exchange::Bybit.normalize(payload).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.trades()[0].side(), TradeSide::Buy);
        assert_eq!(batch.trades()[0].size(), 1.2);
        assert_eq!(batch.trades()[1].side(), TradeSide::Sell);
        assert_eq!(batch.trades()[1].price(), 94999.0);
    }

    #[test]
    fn test_okx_renames_px_and_sz() {
        let payload = json!({
            "code": "0",
            "msg": "",
            "data": [
                {"instId": "BTC-USDT-SWAP", "tradeId": "1", "px": "95100.1",
                 "sz": "3", "side": "sell", "ts": "1700000000000"}
            ]
        });

        let batch = Exchange::Okx.normalize(payload).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.trades()[0].price(), 95100.1);
        assert_eq!(batch.trades()[0].size(), 3.0);
        assert_eq!(batch.trades()[0].side(), TradeSide::Sell);
    }

    #[test]
    fn test_numbers_accepted_as_json_numbers() {
        let payload = json!([{"price": 100.5, "qty": 2, "isBuyerMaker": false}]);

        let batch = Exchange::Binance.normalize(payload).unwrap();

        assert_eq!(batch.trades()[0].price(), 100.5);
        assert_eq!(batch.trades()[0].size(), 2.0);
    }

    #[test]
    fn test_no_filtering_at_normalization() {
        let payload = json!({"data": [
            {"px": "100", "sz": "0.001", "side": "buy"},
            {"px": "100", "sz": "0", "side": "sell"}
        ]});

        assert_eq!(Exchange::Okx.normalize(payload).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_list_is_empty_batch() {
        let payload = json!({"result": {"list": []}});

        assert!(Exchange::Bybit.normalize(payload).unwrap().is_empty());
    }

    #[test]
    fn test_bad_number_fails_whole_batch() {
        let payload = json!([
            {"price": "100", "qty": "1", "isBuyerMaker": false},
            {"price": "abc", "qty": "1", "isBuyerMaker": false}
        ]);

        let err = Exchange::Binance.normalize(payload).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::InvalidNumber {
                field: "price",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_negative_size_fails_batch() {
        let payload = json!({"data": [{"px": "100", "sz": "-1", "side": "buy"}]});

        let err = Exchange::Okx.normalize(payload).unwrap_err();

        assert!(matches!(err, NormalizeError::InvalidTrade(DomainError::InvalidSize(_))));
    }

    #[test]
    fn test_nan_string_fails_batch() {
        let payload = json!([{"price": "NaN", "qty": "1", "isBuyerMaker": true}]);

        let err = Exchange::Binance.normalize(payload).unwrap_err();

        assert!(matches!(err, NormalizeError::InvalidTrade(DomainError::InvalidPrice(_))));
    }

    #[test]
    fn test_unknown_side_fails_batch() {
        let payload = json!({"result": {"list": [
            {"price": "100", "size": "1", "side": "None"}
        ]}});

        let err = Exchange::Bybit.normalize(payload).unwrap_err();

        assert!(matches!(err, NormalizeError::InvalidSide(_)));
    }

    #[test]
    fn test_missing_field_fails_batch() {
        let payload = json!([{"price": "100", "isBuyerMaker": true}]);

        let err = Exchange::Binance.normalize(payload).unwrap_err();

        assert!(matches!(err, NormalizeError::Payload(_)));
    }

    #[test]
    fn test_wrong_envelope_fails_batch() {
        // Bybit error responses carry an empty result object
        let bybit_error = json!({"retCode": 10001, "retMsg": "params error", "result": {}});
        // OKX shape fed to the Binance mapping
        let okx_shape = json!({"data": []});

        assert!(matches!(
            Exchange::Bybit.normalize(bybit_error),
            Err(NormalizeError::Payload(_))
        ));
        assert!(matches!(
            Exchange::Binance.normalize(okx_shape),
            Err(NormalizeError::Payload(_))
        ));
    }
}
