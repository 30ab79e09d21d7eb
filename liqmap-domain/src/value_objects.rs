//! Value Objects for the liqmap Domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must be finite and non-negative
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Size must be finite and non-negative
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Side label is neither buy nor sell
    #[error("Invalid side: {0}")]
    InvalidSide(String),
}

// =============================================================================
// TradeSide
// =============================================================================

/// Aggressor side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Taker bought
    Buy,
    /// Taker sold
    Sell,
}

impl TradeSide {
    /// Infer the taker side from a maker flag.
    ///
    /// A buyer-maker trade means the taker hit the bid, so the aggressor sold.
    pub fn from_buyer_maker(is_buyer_maker: bool) -> Self {
        if is_buyer_maker {
            TradeSide::Sell
        } else {
            TradeSide::Buy
        }
    }
}

impl FromStr for TradeSide {
    type Err = DomainError;

    /// Parse a side label, ignoring case (`buy`, `Buy`, `SELL`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(TradeSide::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(TradeSide::Sell)
        } else {
            Err(DomainError::InvalidSide(format!(
                "{}. Expected: buy or sell",
                s
            )))
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

// =============================================================================
// PriceBin
// =============================================================================

/// Width of a price bin in quote units.
pub const PRICE_BIN_WIDTH: f64 = 100.0;

/// Coarse price level: `floor(price / 100) * 100`.
///
/// Holds the lower edge of the bin as an `f64`, so every finite price keeps
/// its own bin. Ordering and hashing go through `f64::total_cmp` and the bit
/// pattern; `-0.0` is folded into `0.0` on construction.
///
/// # Invariants
/// - `as_f64()` is always an integer multiple of [`PRICE_BIN_WIDTH`]
#[derive(Debug, Clone, Copy)]
pub struct PriceBin(f64);

impl PriceBin {
    /// Bin a price. Callers pass validated (finite, non-negative) prices.
    pub fn from_price(price: f64) -> Self {
        Self((price / PRICE_BIN_WIDTH).floor() * PRICE_BIN_WIDTH + 0.0)
    }

    /// Lower edge of the bin, in the same units as the price.
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl PartialEq for PriceBin {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriceBin {}

impl PartialOrd for PriceBin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriceBin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for PriceBin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for PriceBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_buyer_maker() {
        assert_eq!(TradeSide::from_buyer_maker(true), TradeSide::Sell);
        assert_eq!(TradeSide::from_buyer_maker(false), TradeSide::Buy);
    }

    #[test]
    fn test_side_parse_ignores_case() {
        assert_eq!("buy".parse::<TradeSide>().unwrap(), TradeSide::Buy);
        assert_eq!("Buy".parse::<TradeSide>().unwrap(), TradeSide::Buy);
        assert_eq!("SELL".parse::<TradeSide>().unwrap(), TradeSide::Sell);
        assert_eq!("Sell".parse::<TradeSide>().unwrap(), TradeSide::Sell);
    }

    #[test]
    fn test_side_parse_rejects_unknown() {
        let err = "long".parse::<TradeSide>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidSide(_)));
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TradeSide::Buy).unwrap(), "\"buy\"");
        assert_eq!(TradeSide::Sell.to_string(), "sell");
    }

    #[test]
    fn test_price_bin_boundaries() {
        assert_eq!(PriceBin::from_price(199.99).as_f64(), 100.0);
        assert_eq!(PriceBin::from_price(100.00).as_f64(), 100.0);
        assert_eq!(PriceBin::from_price(200.00).as_f64(), 200.0);
        assert_eq!(PriceBin::from_price(0.0).as_f64(), 0.0);
        assert_eq!(PriceBin::from_price(99_999.5).as_f64(), 99_900.0);
    }

    #[test]
    fn test_price_bin_ordering() {
        assert!(PriceBin::from_price(150.0) < PriceBin::from_price(250.0));
        assert_eq!(PriceBin::from_price(105.0), PriceBin::from_price(199.0));
        assert_eq!(PriceBin::from_price(105.0).as_f64(), 100.0);
    }

    #[test]
    fn test_price_bin_keeps_huge_prices_apart() {
        let low = PriceBin::from_price(1e21);
        let high = PriceBin::from_price(5e21);

        assert_eq!(low.as_f64(), 1e21);
        assert_eq!(high.as_f64(), 5e21);
        assert!(low < high);
    }

    #[test]
    fn test_price_bin_negative_zero_is_zero() {
        let bin = PriceBin::from_price(-0.0);

        assert_eq!(bin, PriceBin::from_price(0.0));
        assert!(bin.as_f64().is_sign_positive());
    }
}
