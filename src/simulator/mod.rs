//! Monte Carlo simulator for the plate-selling / shop-owning strategy.
//!
//! Run thousands of simulated attempts to analyze:
//! - Time to reach the final gold target for each armor threshold
//! - Plate restock cycles needed before the shop is affordable
//! - Shop sleep cycles and purchase trips afterwards
//!
//! Phase 1 ([`selling`]) feeds its gold into phase 2 ([`shop`]); the
//! [`runner`] repeats that per trial and aggregates per threshold.

mod config;
mod error;
pub mod planner;
mod report;
mod runner;
pub mod seed;
pub mod selling;
pub mod shop;

pub use config::RunConfig;
pub use error::{ConfigError, SimError};
pub use planner::{PurchasePlan, PurchaseStrategy};
pub use report::{format_duration, percentile, SimReport, ThresholdSummary, TimeBucket};
pub use runner::{run_simulation, run_threshold, trace_run, RunRecord, RunTrace};
pub use selling::Phase1Outcome;
pub use shop::{CycleLog, NightLog, Phase2Outcome};
