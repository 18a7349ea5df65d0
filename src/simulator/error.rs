//! Error types surfaced by the simulator.

use thiserror::Error;

/// A run configuration the engine refuses to execute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one armor threshold must be provided")]
    NoThresholds,

    #[error("runs must be at least 1")]
    ZeroRuns,

    #[error("nights to sleep must be at least 1")]
    ZeroNights,

    #[error("time bucket width must be at least 1 second")]
    ZeroBucketWidth,

    #[error("{field} must be positive (got {value})")]
    NonPositiveGold { field: &'static str, value: i64 },

    #[error("minimum shop gold {min_shop_gold} must exceed the shop purchase cost {shop_cost}")]
    MinShopGoldTooLow { min_shop_gold: i64, shop_cost: i64 },

    #[error("armor threshold {threshold} can never be met (highest possible offer is {max_offer})")]
    UnreachableThreshold { threshold: u32, max_offer: u32 },

    #[error("armor threshold {threshold} outside valid range {min}-{max}")]
    ThresholdOutOfRange { threshold: u32, min: u32, max: u32 },

    #[error("additional trip cutoff must be non-negative (got {0})")]
    NegativeTripCutoff(i64),

    #[error("abacus-greedy strategy requires a positive count threshold and price cutoff")]
    InvalidAbacusStrategy,
}

/// Failure of a simulation batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("insufficient gold to purchase the shop: have {gold}, need {cost}")]
    InsufficientShopGold { gold: i64, cost: i64 },

    #[error("threshold index {index} is out of range for {len} threshold(s)")]
    ThresholdIndex { index: usize, len: usize },
}
