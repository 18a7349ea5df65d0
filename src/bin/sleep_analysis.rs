//! Compare sleep policies by their tail latency.
//!
//! Runs one threshold under several sleep policies, prints mean / P90 / P99 /
//! max completion time and replays the slowest run cycle by cycle.
//!
//! Usage:
//!   cargo run --bin sleep_analysis -- [--runs N] [--seed S]

use std::env;
use std::str::FromStr;
use taloon_sim::init_tracing;
use taloon_sim::simulator::{
    format_duration, percentile, run_threshold, seed::resolve_base_seed, trace_run, RunConfig,
    SimError,
};
use thiserror::Error;

struct Scenario {
    name: &'static str,
    apply: fn(&mut RunConfig),
}

fn scenarios() -> [Scenario; 3] {
    [
        Scenario {
            name: "Always sleep 3 nights",
            apply: |_| {},
        },
        Scenario {
            name: "Sleep 2 nights for <=7 items",
            apply: |config| config.two_sleep_item_threshold = Some(7),
        },
        Scenario {
            name: "Always sleep 2 nights",
            apply: |config| config.nights_to_sleep = 2,
        },
    ]
}

fn base_config(runs: u32, seed: Option<u64>) -> RunConfig {
    RunConfig {
        runs,
        start_gold: 35_575,
        min_shop_gold: 35_575,
        final_target: 26_000,
        thresholds: vec![1570],
        nights_to_sleep: 3,
        use_far_shop: true,
        seed,
        ..Default::default()
    }
}

#[derive(Debug, Error, PartialEq)]
enum ArgError {
    #[error("{flag} requires a value")]
    MissingValue { flag: String },

    #[error("{flag} must be an integer (got {value})")]
    InvalidNumber { flag: String, value: String },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, PartialEq)]
enum Command {
    Analyze { runs: u32, seed: Option<u64> },
    Help,
}

fn parse_number<T: FromStr>(flag: &str, value: Option<&String>) -> Result<T, ArgError> {
    let value = value.ok_or_else(|| ArgError::MissingValue {
        flag: flag.to_string(),
    })?;
    value.trim().parse().map_err(|_| ArgError::InvalidNumber {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_args(args: &[String]) -> Result<Command, ArgError> {
    let mut runs = 20_000;
    let mut seed = None;

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-n" | "--runs" => {
                i += 1;
                runs = parse_number(arg, args.get(i))?;
            }
            "-s" | "--seed" => {
                i += 1;
                seed = Some(parse_number(arg, args.get(i))?);
            }
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(ArgError::UnknownArgument(other.to_string())),
        }
        i += 1;
    }
    Ok(Command::Analyze { runs, seed })
}

fn analyze(scenario: &Scenario, config: &RunConfig, base_seed: u64) -> Result<(), SimError> {
    config.validate()?;
    let threshold = config.thresholds[0];
    let records = run_threshold(config, base_seed, threshold)?;

    let times: Vec<f64> = records.iter().map(|r| r.total_time).collect();
    let avg = times.iter().sum::<f64>() / times.len() as f64;
    let Some((slowest_index, slowest_time)) = times
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    else {
        return Ok(());
    };

    println!("Scenario: {}", scenario.name);
    println!(
        "  Avg: {:.2}s ({}) | P90: {} | P99: {} | Max: {}",
        avg,
        format_duration(avg),
        format_duration(percentile(&times, 90.0)),
        format_duration(percentile(&times, 99.0)),
        format_duration(slowest_time)
    );
    println!("  Longest run index: {}", slowest_index);
    println!("  Cycle breakdown for longest run:");

    let trace = trace_run(config, base_seed, 0, slowest_index as u32)?;
    for cycle in &trace.cycles {
        println!(
            "    Cycle {}: +{} items, slept {}, sold {}, unsold {}, time {:.2}s",
            cycle.cycle_index,
            cycle.items_added,
            cycle.nights_slept,
            cycle.items_sold,
            cycle.inventory_after_sleep,
            cycle.time_spent
        );
        for night in &cycle.nights {
            println!(
                "      Night {}: sold {}, remaining {}",
                night.night, night.sold, night.inventory_remaining
            );
        }
    }
    println!();
    Ok(())
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let (runs, seed) = match parse_args(&args) {
        Ok(Command::Analyze { runs, seed }) => (runs, seed),
        Ok(Command::Help) => {
            println!("Usage: sleep_analysis [--runs N] [--seed S]");
            return;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let base_seed = resolve_base_seed(seed);
    println!("Base seed: {} | Runs per scenario: {}", base_seed, runs);
    println!();

    for scenario in &scenarios() {
        let mut config = base_config(runs, Some(base_seed));
        (scenario.apply)(&mut config);
        if let Err(err) = analyze(scenario, &config, base_seed) {
            eprintln!("Error in scenario '{}': {err}", scenario.name);
            std::process::exit(1);
        }
    }
}
