//! Simulation configuration.

use super::error::ConfigError;
use super::planner::PurchaseStrategy;
use crate::economy::constants::{
    CRITICAL_SALE_MAX, DEFAULT_ARMOR_THRESHOLDS, DEFAULT_FINAL_TARGET, DEFAULT_MIN_SHOP_GOLD,
    DEFAULT_SIMULATION_RUNS, DEFAULT_SLEEP_NIGHTS, DEFAULT_START_GOLD,
    DEFAULT_TIME_BUCKET_SECONDS, MAX_ARMOR_PRICE, MIN_ARMOR_PRICE, SHOP_PURCHASE_COST,
};
use serde::{Deserialize, Serialize};

/// Configuration for a multi-run experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Gold on hand when the simulation begins
    pub start_gold: i64,

    /// Gold required after collecting shop profits
    pub final_target: i64,

    /// Gold required before purchasing the shop
    pub min_shop_gold: i64,

    /// Whether purchase trips may continue on to the far shop
    pub use_far_shop: bool,

    /// Nights slept per cycle before collecting profits
    pub nights_to_sleep: u32,

    /// Monte Carlo runs per threshold
    pub runs: u32,

    /// Candidate armor offer thresholds, each evaluated independently
    #[serde(alias = "armor_thresholds")]
    pub thresholds: Vec<u32>,

    /// Minimum gold left over to justify a second purchase trip (None = one trip per cycle)
    pub additional_trip_cutoff: Option<i64>,

    /// Base random seed (None = fresh OS entropy, not reproducible)
    pub seed: Option<u64>,

    /// Sleep at most two nights when a cycle handed over this many items or fewer
    pub two_sleep_item_threshold: Option<u32>,

    /// Sleep a single night when a cycle handed over this many items or fewer
    pub one_sleep_item_threshold: Option<u32>,

    pub purchase_strategy: PurchaseStrategy,

    /// Sell every restocked batch to the last plate, paying a return wing fee
    /// once it is empty, instead of stopping as soon as the gold target is met
    pub sell_out_batches: bool,

    /// Make the first trip a single-shop walk straight from the shop counter
    /// at a flat travel cost
    pub initial_walk: bool,

    /// Histogram bucket width in seconds
    pub time_bucket_seconds: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_gold: DEFAULT_START_GOLD,
            final_target: DEFAULT_FINAL_TARGET,
            min_shop_gold: DEFAULT_MIN_SHOP_GOLD,
            use_far_shop: false,
            nights_to_sleep: DEFAULT_SLEEP_NIGHTS,
            runs: DEFAULT_SIMULATION_RUNS,
            thresholds: DEFAULT_ARMOR_THRESHOLDS.to_vec(),
            additional_trip_cutoff: None,
            seed: None,
            two_sleep_item_threshold: None,
            one_sleep_item_threshold: None,
            purchase_strategy: PurchaseStrategy::Greedy,
            sell_out_batches: false,
            initial_walk: false,
            time_bucket_seconds: DEFAULT_TIME_BUCKET_SECONDS,
        }
    }
}

impl RunConfig {
    /// Quick seeded config for smoke tests and examples
    pub fn quick(runs: u32, seed: u64) -> Self {
        Self {
            runs,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Nights to sleep after a cycle that handed `items_added` items to Neta.
    pub fn nights_for_cycle(&self, items_added: usize) -> u32 {
        let within = |limit: Option<u32>| limit.is_some_and(|l| items_added <= l as usize);
        if within(self.one_sleep_item_threshold) {
            self.nights_to_sleep.min(1)
        } else if within(self.two_sleep_item_threshold) {
            self.nights_to_sleep.min(2)
        } else {
            self.nights_to_sleep
        }
    }

    /// Reject configurations the engine cannot run to completion.
    ///
    /// Thresholds are only bounded by the best possible offer here; front
    /// ends additionally call [`RunConfig::validate_price_ladder`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.is_empty() {
            return Err(ConfigError::NoThresholds);
        }
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if self.nights_to_sleep == 0 {
            return Err(ConfigError::ZeroNights);
        }
        if self.time_bucket_seconds == 0 {
            return Err(ConfigError::ZeroBucketWidth);
        }
        for (field, value) in [
            ("start gold", self.start_gold),
            ("final target", self.final_target),
            ("min shop gold", self.min_shop_gold),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveGold { field, value });
            }
        }
        if self.min_shop_gold <= SHOP_PURCHASE_COST {
            return Err(ConfigError::MinShopGoldTooLow {
                min_shop_gold: self.min_shop_gold,
                shop_cost: SHOP_PURCHASE_COST,
            });
        }
        if let Some(&threshold) = self.thresholds.iter().find(|&&t| t > CRITICAL_SALE_MAX) {
            return Err(ConfigError::UnreachableThreshold {
                threshold,
                max_offer: CRITICAL_SALE_MAX,
            });
        }
        if let Some(cutoff) = self.additional_trip_cutoff.filter(|&c| c < 0) {
            return Err(ConfigError::NegativeTripCutoff(cutoff));
        }
        if let PurchaseStrategy::AbacusGreedy {
            count_threshold,
            price_cutoff,
        } = self.purchase_strategy
        {
            if count_threshold == 0 || price_cutoff == 0 {
                return Err(ConfigError::InvalidAbacusStrategy);
            }
        }
        Ok(())
    }

    /// Every threshold must lie within the merchant's appraisal range.
    pub fn validate_price_ladder(&self) -> Result<(), ConfigError> {
        match self
            .thresholds
            .iter()
            .find(|&&t| !(MIN_ARMOR_PRICE..=MAX_ARMOR_PRICE).contains(&t))
        {
            Some(&threshold) => Err(ConfigError::ThresholdOutOfRange {
                threshold,
                min: MIN_ARMOR_PRICE,
                max: MAX_ARMOR_PRICE,
            }),
            None => Ok(()),
        }
    }
}
