//! Liquidation Aggregator
//!
//! Merges normalized trade batches into a per-price-bin volume table and
//! picks the bin with the largest buy volume and the largest sell volume.
//!
//! # Algorithm
//!
//! ```text
//! batches ─► concat ─► size > 0.1 ─► bin = floor(price / 100) * 100
//!                                      │
//!                                      ▼
//!                     BTreeMap<bin, {buy, sell}> (order-independent sums)
//!                                      │
//!                                      ▼
//!                      argmax(buy), argmax(sell), lowest bin on ties
//! ```
//!
//! The result depends only on the multiset of trades: batch order and record
//! order never change it.

use std::collections::BTreeMap;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use liqmap_domain::{HeatmapResult, NormalizedTrade, PriceBin, TradeBatch, TradeSide};

// =============================================================================
// Constants
// =============================================================================

/// Minimum size (exclusive) for a trade to count as a liquidation.
pub const LIQUIDATION_SIZE_THRESHOLD: f64 = 0.1;

// =============================================================================
// Heatmap
// =============================================================================

/// Liquidation sizes of one side of one price bin.
///
/// Summed exactly as `Decimal` when every size (and the total) fits;
/// otherwise summed as `f64` in ascending size order. Both paths give the
/// same total for any insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideVolume {
    sizes: Vec<f64>,
}

impl SideVolume {
    /// Number of trades on this side.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Whether no trade landed on this side.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Exact decimal sum, if every size and the total fit in a `Decimal`.
    pub fn exact_total(&self) -> Option<Decimal> {
        self.sizes.iter().try_fold(Decimal::ZERO, |sum, &size| {
            sum.checked_add(Decimal::from_f64(size)?)
        })
    }

    /// Summed size.
    pub fn total(&self) -> f64 {
        if let Some(total) = self.exact_total().and_then(|sum| sum.to_f64()) {
            return total;
        }

        let mut sizes = self.sizes.clone();
        sizes.sort_by(f64::total_cmp);
        sizes.iter().sum()
    }

    fn push(&mut self, size: f64) {
        self.sizes.push(size);
    }
}

/// Liquidation volume of one price bin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelVolume {
    /// Buy-side sizes
    pub buy: SideVolume,
    /// Sell-side sizes
    pub sell: SideVolume,
}

impl LevelVolume {
    /// Volume for one side.
    pub fn side(&self, side: TradeSide) -> &SideVolume {
        match side {
            TradeSide::Buy => &self.buy,
            TradeSide::Sell => &self.sell,
        }
    }

    fn add(&mut self, trade: &NormalizedTrade) {
        match trade.side() {
            TradeSide::Buy => self.buy.push(trade.size()),
            TradeSide::Sell => self.sell.push(trade.size()),
        }
    }
}

/// Per-bin, per-side liquidation volume table.
///
/// # Invariants
/// - Never empty: a heatmap with no levels is reported as `None` by [`Heatmap::build`]
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    levels: BTreeMap<PriceBin, LevelVolume>,
}

impl Heatmap {
    /// Build the table from every trade in `batches` that passes the size filter.
    ///
    /// Returns `None` when there are no trades at all, or none above the
    /// threshold.
    pub fn build<'a, I>(batches: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TradeBatch>,
    {
        let mut levels: BTreeMap<PriceBin, LevelVolume> = BTreeMap::new();

        for trade in batches.into_iter().flat_map(|batch| batch.iter()) {
            if !is_liquidation(trade) {
                continue;
            }
            levels.entry(trade.price_bin()).or_default().add(trade);
        }

        if levels.is_empty() {
            return None;
        }

        Some(Self { levels })
    }

    /// Number of populated price bins.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no bin is populated. Never true for a built heatmap.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Volume of one bin, if populated.
    pub fn level(&self, bin: PriceBin) -> Option<&LevelVolume> {
        self.levels.get(&bin)
    }

    /// Iterate bins in ascending price order.
    pub fn levels(&self) -> impl Iterator<Item = (PriceBin, &LevelVolume)> {
        self.levels.iter().map(|(bin, level)| (*bin, level))
    }

    /// Bin with the largest volume for `side`, lowest bin winning ties.
    ///
    /// Bins without volume on that side are not candidates.
    pub fn peak(&self, side: TradeSide) -> Option<PriceBin> {
        let mut best: Option<(PriceBin, f64)> = None;

        for (bin, level) in self.levels() {
            let volume = level.side(side);
            if volume.is_empty() {
                continue;
            }
            let total = volume.total();
            match best {
                Some((_, best_total)) if total <= best_total => {}
                _ => best = Some((bin, total)),
            }
        }

        best.map(|(bin, _)| bin)
    }

    /// Collapse the table into the two reported levels.
    pub fn top_levels(&self) -> HeatmapResult {
        HeatmapResult::from_bins(self.peak(TradeSide::Buy), self.peak(TradeSide::Sell))
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Whether a trade is large enough to be treated as a liquidation.
pub fn is_liquidation(trade: &NormalizedTrade) -> bool {
    trade.size() > LIQUIDATION_SIZE_THRESHOLD
}

/// Aggregate all batches into the top long/short liquidation levels.
///
/// `None` means "no data": either no batches/trades were supplied, or none
/// exceeded [`LIQUIDATION_SIZE_THRESHOLD`].
pub fn aggregate<'a, I>(batches: I) -> Option<HeatmapResult>
where
    I: IntoIterator<Item = &'a TradeBatch>,
{
    Heatmap::build(batches).map(|heatmap| heatmap.top_levels())
}

// =============================================================================
// Tests
// =============================================================================
