//! Market Data Types
//!
//! Canonical trade and heatmap types used across liqmap.
//! These are exchange-agnostic: every connector normalizes into them.

use serde::{Deserialize, Serialize};

use crate::value_objects::{DomainError, PriceBin, TradeSide};

// =============================================================================
// NormalizedTrade
// =============================================================================

/// Single executed trade in the common schema.
///
/// # Invariants
/// - `price` and `size` are finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedTrade {
    price: f64,
    size: f64,
    side: TradeSide,
}

impl NormalizedTrade {
    /// Create a new trade with validation.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` / `DomainError::InvalidSize` if a
    /// value is NaN, infinite, or negative.
    pub fn new(price: f64, size: f64, side: TradeSide) -> Result<Self, DomainError> {
        if !price.is_finite() || price < 0.0 {
            return Err(DomainError::InvalidPrice(format!(
                "{} (must be finite and non-negative)",
                price
            )));
        }
        if !size.is_finite() || size < 0.0 {
            return Err(DomainError::InvalidSize(format!(
                "{} (must be finite and non-negative)",
                size
            )));
        }

        Ok(Self { price, size, side })
    }

    /// Trade price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Trade size in the exchange's native units.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Aggressor side.
    pub fn side(&self) -> TradeSide {
        self.side
    }

    /// Price level this trade falls into.
    pub fn price_bin(&self) -> PriceBin {
        PriceBin::from_price(self.price)
    }
}

// =============================================================================
// TradeBatch
// =============================================================================

/// Trades produced by one exchange in one fetch cycle.
///
/// Record order carries no meaning for aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeBatch(Vec<NormalizedTrade>);

impl TradeBatch {
    /// Wrap already-validated trades.
    pub fn new(trades: Vec<NormalizedTrade>) -> Self {
        Self(trades)
    }

    /// Number of trades in the batch.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no trades.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the trades.
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedTrade> {
        self.0.iter()
    }

    /// Borrow the trades as a slice.
    pub fn trades(&self) -> &[NormalizedTrade] {
        &self.0
    }
}

impl From<Vec<NormalizedTrade>> for TradeBatch {
    fn from(trades: Vec<NormalizedTrade>) -> Self {
        Self(trades)
    }
}

impl FromIterator<NormalizedTrade> for TradeBatch {
    fn from_iter<I: IntoIterator<Item = NormalizedTrade>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TradeBatch {
    type Item = &'a NormalizedTrade;
    type IntoIter = std::slice::Iter<'a, NormalizedTrade>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// HeatmapResult
// =============================================================================

/// Price levels with the largest approximated liquidation volume.
///
/// A side with no volume reports `0.0`. The absence of any usable data is
/// modelled separately (`Option<HeatmapResult>`), never as `{0.0, 0.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapResult {
    /// Price bin with the largest summed buy size
    pub long_liq: f64,
    /// Price bin with the largest summed sell size
    pub short_liq: f64,
}

impl HeatmapResult {
    /// Create a result from the winning bins of each side.
    pub fn from_bins(long: Option<PriceBin>, short: Option<PriceBin>) -> Self {
        Self {
            long_liq: long.map(|b| b.as_f64()).unwrap_or(0.0),
            short_liq: short.map(|b| b.as_f64()).unwrap_or(0.0),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
