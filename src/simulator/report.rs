//! Aggregation of run records into per-threshold summaries.

use super::runner::RunRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Format seconds as `m:ss`.
pub fn format_duration(total_seconds: f64) -> String {
    let safe = if total_seconds.is_finite() {
        total_seconds.max(0.0)
    } else {
        0.0
    };
    let whole = safe.round() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Nearest-rank percentile, `pct` in 0..=100.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// Start of the histogram bucket `time` falls into.
pub fn bucket_start(time: f64, width: u32) -> u64 {
    (time / width as f64).floor().max(0.0) as u64 * width as u64
}

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub start_seconds: u64,
    /// `m:ss-m:ss`
    pub label: String,
    pub count: u32,
}

/// Statistics for one armor threshold across all of its runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSummary {
    pub threshold: u32,
    pub runs: u32,
    pub average_time: f64,
    pub std_dev_time: f64,
    pub fastest_time: f64,
    pub average_restock_cycles: f64,
    pub average_shop_cycles: f64,
    pub average_shop_trips: f64,
    pub average_trips_per_cycle: f64,
    /// Ordered by bucket start
    pub buckets: Vec<TimeBucket>,
}

impl ThresholdSummary {
    pub fn from_records(threshold: u32, records: &[RunRecord], bucket_width: u32) -> Self {
        let times: Vec<f64> = records.iter().map(|r| r.total_time).collect();
        let counter_mean =
            |f: fn(&RunRecord) -> u32| mean(&records.iter().map(|r| f(r) as f64).collect::<Vec<_>>());

        let average_shop_cycles = counter_mean(|r| r.profit_cycles);
        let average_shop_trips = counter_mean(|r| r.purchase_trips);
        let average_trips_per_cycle = if average_shop_cycles == 0.0 {
            0.0
        } else {
            average_shop_trips / average_shop_cycles
        };

        let mut histogram: BTreeMap<u64, u32> = BTreeMap::new();
        for &time in &times {
            *histogram.entry(bucket_start(time, bucket_width)).or_insert(0) += 1;
        }
        let buckets = histogram
            .into_iter()
            .map(|(start, count)| TimeBucket {
                start_seconds: start,
                label: format!(
                    "{}-{}",
                    format_duration(start as f64),
                    format_duration((start + bucket_width as u64) as f64)
                ),
                count,
            })
            .collect();

        Self {
            threshold,
            runs: records.len() as u32,
            average_time: mean(&times),
            std_dev_time: population_std_dev(&times),
            fastest_time: times.iter().copied().reduce(f64::min).unwrap_or(0.0),
            average_restock_cycles: counter_mean(|r| r.restock_cycles),
            average_shop_cycles,
            average_shop_trips,
            average_trips_per_cycle,
            buckets,
        }
    }

    pub fn histogram_total(&self) -> u32 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Results of a whole experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    /// Base seed actually used (drawn from entropy when none was given)
    pub base_seed: u64,
    pub seed_provided: bool,
    pub runs: u32,
    pub time_bucket_seconds: u32,
    pub summaries: Vec<ThresholdSummary>,
}

impl SimReport {
    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 TALOON SHOP STRATEGY REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        let seed_note = if self.seed_provided { "" } else { " (random)" };
        report.push_str(&format!(
            "Base seed: {}{}    Runs per threshold: {}\n\n",
            self.base_seed, seed_note, self.runs
        ));

        for summary in &self.summaries {
            report.push_str(&format!(
                "── THRESHOLD {} ─────────────────────────────────────────────\n",
                summary.threshold
            ));
            report.push_str(&format!(
                "  Avg time:              {} (σ {})\n",
                format_duration(summary.average_time),
                format_duration(summary.std_dev_time)
            ));
            report.push_str(&format!(
                "  Fastest run:           {}\n",
                format_duration(summary.fastest_time)
            ));
            report.push_str(&format!(
                "  Avg plate restocks:    {:.2}\n",
                summary.average_restock_cycles
            ));
            report.push_str(&format!(
                "  Avg Neta sleep loops:  {:.2} (≈ {:.2} trips; {:.2} trips/loop)\n",
                summary.average_shop_cycles,
                summary.average_shop_trips,
                summary.average_trips_per_cycle
            ));
            report.push_str(&format!(
                "  Time distribution ({} buckets):\n",
                format_duration(self.time_bucket_seconds as f64)
            ));

            let max_count = summary.buckets.iter().map(|b| b.count).max().unwrap_or(0);
            for bucket in &summary.buckets {
                let bar_len = if max_count == 0 {
                    0
                } else {
                    (bucket.count as f64 / max_count as f64 * 30.0).ceil() as usize
                };
                report.push_str(&format!(
                    "    {:>11}: {:>6} {}\n",
                    bucket.label,
                    bucket.count,
                    "█".repeat(bar_len)
                ));
            }
            report.push('\n');
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Summary with the lowest average time.
    pub fn best(&self) -> Option<&ThresholdSummary> {
        self.summaries
            .iter()
            .min_by(|a, b| a.average_time.total_cmp(&b.average_time))
    }
}
