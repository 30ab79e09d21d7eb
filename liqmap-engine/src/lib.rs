//! liqmap Engine Layer
//!
//! Pure aggregation logic, deterministic, no I/O.
//! Takes normalized trade batches → returns the top liquidation levels.

#![warn(clippy::all)]

pub mod aggregator;

pub use aggregator::{
    aggregate, is_liquidation, Heatmap, LevelVolume, SideVolume, LIQUIDATION_SIZE_THRESHOLD,
};
