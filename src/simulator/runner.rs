//! Experiment runner: chains the two phases per trial and aggregates trials
//! per threshold.
//!
//! Trials of one threshold run on the rayon pool. Each owns a random stream
//! derived from (base seed, threshold, run index) and results are collected
//! in run-index order, so reports are identical however the pool schedules.

use super::config::RunConfig;
use super::error::SimError;
use super::report::{format_duration, SimReport, ThresholdSummary};
use super::seed::{resolve_base_seed, trial_rng, trial_seed};
use super::selling::{sell_until_target, Phase1Outcome};
use super::shop::{run_shop_phase, CycleLog, Phase2Outcome};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub total_time: f64,
    pub restock_cycles: u32,
    pub profit_cycles: u32,
    pub purchase_trips: u32,
}

impl RunRecord {
    pub fn from_phases(phase1: &Phase1Outcome, phase2: &Phase2Outcome) -> Self {
        Self {
            total_time: phase1.time_seconds + phase2.time_seconds,
            restock_cycles: phase1.restock_cycles,
            profit_cycles: phase2.profit_cycles,
            purchase_trips: phase2.purchase_trips,
        }
    }
}

/// Full detail of a single replayed trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTrace {
    pub threshold: u32,
    pub base_seed: u64,
    pub run_index: u32,
    pub seed: u64,
    pub total_time: f64,
    pub phase1: Phase1Outcome,
    pub phase2: Phase2Outcome,
    pub cycles: Vec<CycleLog>,
}

fn simulate_trial(
    config: &RunConfig,
    base_seed: u64,
    threshold: u32,
    run_index: u32,
    cycle_log: Option<&mut Vec<CycleLog>>,
) -> Result<(Phase1Outcome, Phase2Outcome), SimError> {
    let mut rng = trial_rng(base_seed, threshold, run_index);
    let phase1 = sell_until_target(
        &mut rng,
        threshold,
        config.min_shop_gold,
        config.start_gold,
        config.sell_out_batches,
    );
    let phase2 = run_shop_phase(&mut rng, config, phase1.gold, cycle_log)?;
    Ok((phase1, phase2))
}

/// Run every trial for one threshold.
pub fn run_threshold(
    config: &RunConfig,
    base_seed: u64,
    threshold: u32,
) -> Result<Vec<RunRecord>, SimError> {
    (0..config.runs)
        .into_par_iter()
        .map(|run_index| {
            let (phase1, phase2) = simulate_trial(config, base_seed, threshold, run_index, None)?;
            let record = RunRecord::from_phases(&phase1, &phase2);
            debug!(
                threshold,
                run_index,
                total_time = record.total_time,
                restocks = record.restock_cycles,
                cycles = record.profit_cycles,
                "trial complete"
            );
            Ok(record)
        })
        .collect()
}

/// Run the full experiment and return a report.
pub fn run_simulation(config: &RunConfig) -> Result<SimReport, SimError> {
    config.validate()?;
    let base_seed = resolve_base_seed(config.seed);

    let mut summaries = Vec::with_capacity(config.thresholds.len());
    for &threshold in &config.thresholds {
        let records = run_threshold(config, base_seed, threshold)?;
        let summary = ThresholdSummary::from_records(threshold, &records, config.time_bucket_seconds);
        info!(
            threshold,
            runs = summary.runs,
            average = %format_duration(summary.average_time),
            std_dev = %format_duration(summary.std_dev_time),
            "threshold complete"
        );
        summaries.push(summary);
    }

    Ok(SimReport {
        base_seed,
        seed_provided: config.seed.is_some(),
        runs: config.runs,
        time_bucket_seconds: config.time_bucket_seconds,
        summaries,
    })
}

/// Replay one trial with cycle tracing enabled.
///
/// Produces the same numbers as that trial inside [`run_simulation`] given
/// the same base seed.
pub fn trace_run(
    config: &RunConfig,
    base_seed: u64,
    threshold_index: usize,
    run_index: u32,
) -> Result<RunTrace, SimError> {
    config.validate()?;
    let threshold = *config
        .thresholds
        .get(threshold_index)
        .ok_or(SimError::ThresholdIndex {
            index: threshold_index,
            len: config.thresholds.len(),
        })?;

    let mut cycles = Vec::new();
    let (phase1, phase2) =
        simulate_trial(config, base_seed, threshold, run_index, Some(&mut cycles))?;

    Ok(RunTrace {
        threshold,
        base_seed,
        run_index,
        seed: trial_seed(base_seed, threshold, run_index),
        total_time: phase1.time_seconds + phase2.time_seconds,
        phase1,
        phase2,
        cycles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::error::ConfigError;

    fn small_config() -> RunConfig {
        RunConfig {
            runs: 20,
            seed: Some(12345),
            thresholds: vec![1617, 1710],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_simulation() {
        let config = small_config();
        let report = run_simulation(&config).unwrap();

        assert_eq!(report.base_seed, 12345);
        assert!(report.seed_provided);
        assert_eq!(report.summaries.len(), 2);
        for summary in &report.summaries {
            assert_eq!(summary.runs, 20);
            assert_eq!(summary.histogram_total(), 20);
            assert!(summary.average_time > 0.0);
        }
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let config = RunConfig {
            thresholds: Vec::new(),
            ..small_config()
        };
        assert_eq!(
            run_simulation(&config),
            Err(SimError::Config(ConfigError::NoThresholds))
        );
    }

    #[test]
    fn test_unseeded_run_reports_its_seed() {
        let config = RunConfig {
            seed: None,
            runs: 3,
            thresholds: vec![1700],
            ..Default::default()
        };
        let report = run_simulation(&config).unwrap();
        assert!(!report.seed_provided);

        // Reusing the reported seed reproduces the report.
        let replay = run_simulation(&RunConfig {
            seed: Some(report.base_seed),
            ..config
        })
        .unwrap();
        assert_eq!(replay.summaries, report.summaries);
    }

    #[test]
    fn test_trace_matches_batch_trial() {
        let config = small_config();
        let records = run_threshold(&config, 12345, 1710).unwrap();
        let trace = trace_run(&config, 12345, 1, 7).unwrap();

        assert_eq!(trace.threshold, 1710);
        assert_eq!(trace.total_time, records[7].total_time);
        assert_eq!(trace.phase1.restock_cycles, records[7].restock_cycles);
        assert_eq!(trace.phase2.profit_cycles as usize, trace.cycles.len());
    }

    #[test]
    fn test_sell_out_flag_reaches_phase_one() {
        let config = RunConfig {
            sell_out_batches: true,
            ..small_config()
        };
        for run in 0..config.runs {
            let trace = trace_run(&config, 12345, 0, run).unwrap();
            assert_eq!(trace.phase1.plates_in_hand, 0);
        }
    }

    #[test]
    fn test_trace_bad_threshold_index() {
        let config = small_config();
        assert_eq!(
            trace_run(&config, 1, 5, 0),
            Err(SimError::ThresholdIndex { index: 5, len: 2 })
        );
    }
}
