//! liqmap Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! Contains the normalized trade schema, price bins and the heatmap result.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod market_data;
pub mod value_objects;

// Re-export commonly used types
pub use market_data::{HeatmapResult, NormalizedTrade, TradeBatch};
pub use value_objects::{DomainError, PriceBin, TradeSide, PRICE_BIN_WIDTH};
