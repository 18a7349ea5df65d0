//! Taloon shop strategy simulator CLI.
//!
//! Usage:
//!   cargo run -- [OPTIONS]
//!
//! Examples:
//!   cargo run                                   # Default: 1000 runs per threshold
//!   cargo run -- --runs 200 --thresholds 1617,1710
//!   cargo run -- --seed 42 --json               # Reproducible, save JSON report
//!   cargo run --features web -- --serve=8080    # Browser front end

use std::env;
use std::str::FromStr;
use taloon_sim::economy::constants::{MAX_ARMOR_PRICE, MIN_ARMOR_PRICE};
use taloon_sim::simulator::{format_duration, ConfigError, PurchaseStrategy};
use taloon_sim::{init_tracing, run_simulation, RunConfig};
use thiserror::Error;

#[cfg(feature = "web")]
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
enum CliError {
    #[error("{flag} requires a value")]
    MissingValue { flag: String },

    #[error("{flag} must be an integer (got {value})")]
    InvalidNumber { flag: String, value: String },

    #[error("{0}")]
    InvalidStrategy(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("--abacus-count-threshold and --abacus-price-cutoff only apply to --purchase-strategy abacus-greedy")]
    AbacusWithoutStrategy,

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

#[derive(Debug, PartialEq)]
enum Command {
    Run { config: RunConfig, save_json: bool },
    #[cfg_attr(not(feature = "web"), allow(dead_code))]
    Serve { port: u16 },
    Help,
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Run with --help for usage.");
            std::process::exit(1);
        }
    };

    match command {
        Command::Help => print_help(),
        Command::Serve { port } => serve(port),
        Command::Run { config, save_json } => run(&config, save_json),
    }
}

fn run(config: &RunConfig, save_json: bool) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              TALOON SHOP STRATEGY SIMULATOR                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.runs);
    println!("  Thresholds:     {:?}", config.thresholds);
    println!("  Start gold:     {}", config.start_gold);
    println!("  Min shop gold:  {}", config.min_shop_gold);
    println!("  Final target:   {}", config.final_target);
    println!("  Nights/cycle:   {}", config.nights_to_sleep);
    println!("  Far shop:       {}", config.use_far_shop);
    println!("  Sell out:       {}", config.sell_out_batches);
    println!("  Initial walk:   {}", config.initial_walk);
    println!("  Strategy:       {}", config.purchase_strategy.name());
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_simulation(config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if let Some(best) = report.best() {
        println!(
            "Fastest threshold on average: {} ({})",
            best.threshold,
            format_duration(best.average_time)
        );
    }

    if save_json {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(err) => {
                eprintln!("Failed to write JSON report {filename}: {err}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(feature = "web")]
fn serve(port: u16) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = runtime.block_on(taloon_sim::web::start_web_server(port)) {
        eprintln!("Web server error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "web"))]
fn serve(_port: u16) {
    eprintln!("Error: this build has no web front end; rebuild with --features web");
    std::process::exit(1);
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue {
            flag: flag.to_string(),
        })
}

fn parse_number<T: FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::InvalidNumber {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_thresholds(value: &str) -> Result<Vec<u32>, CliError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let threshold: u32 = parse_number("--thresholds", part)?;
            if (MIN_ARMOR_PRICE..=MAX_ARMOR_PRICE).contains(&threshold) {
                Ok(threshold)
            } else {
                Err(ConfigError::ThresholdOutOfRange {
                    threshold,
                    min: MIN_ARMOR_PRICE,
                    max: MAX_ARMOR_PRICE,
                }
                .into())
            }
        })
        .collect()
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut config = RunConfig::default();
    let mut save_json = false;
    let mut strategy_name: Option<String> = None;
    let mut abacus_count: Option<u32> = None;
    let mut abacus_cutoff: Option<u32> = None;

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--start-gold" => config.start_gold = parse_number(arg, next_value(args, &mut i, arg)?)?,
            "--min-shop-gold" => {
                config.min_shop_gold = parse_number(arg, next_value(args, &mut i, arg)?)?
            }
            "--final-target" => {
                config.final_target = parse_number(arg, next_value(args, &mut i, arg)?)?
            }
            "--thresholds" => config.thresholds = parse_thresholds(next_value(args, &mut i, arg)?)?,
            "-n" | "--runs" => config.runs = parse_number(arg, next_value(args, &mut i, arg)?)?,
            "--nights" => {
                config.nights_to_sleep = parse_number(arg, next_value(args, &mut i, arg)?)?
            }
            "--two-sleep-threshold" => {
                config.two_sleep_item_threshold =
                    Some(parse_number(arg, next_value(args, &mut i, arg)?)?)
            }
            "--one-sleep-threshold" => {
                config.one_sleep_item_threshold =
                    Some(parse_number(arg, next_value(args, &mut i, arg)?)?)
            }
            "--additional-trip-cutoff" => {
                config.additional_trip_cutoff =
                    Some(parse_number(arg, next_value(args, &mut i, arg)?)?)
            }
            "--far-shop" => config.use_far_shop = true,
            "--sell-out-batches" => config.sell_out_batches = true,
            "--initial-walk" => config.initial_walk = true,
            "-s" | "--seed" => config.seed = Some(parse_number(arg, next_value(args, &mut i, arg)?)?),
            "--purchase-strategy" => {
                strategy_name = Some(next_value(args, &mut i, arg)?.to_string())
            }
            "--abacus-count-threshold" => {
                abacus_count = Some(parse_number(arg, next_value(args, &mut i, arg)?)?)
            }
            "--abacus-price-cutoff" => {
                abacus_cutoff = Some(parse_number(arg, next_value(args, &mut i, arg)?)?)
            }
            "--time-bucket-seconds" => {
                config.time_bucket_seconds = parse_number(arg, next_value(args, &mut i, arg)?)?
            }
            "--json" => save_json = true,
            #[cfg(feature = "web")]
            "--serve" => return Ok(Command::Serve { port: DEFAULT_PORT }),
            #[cfg(feature = "web")]
            _ if arg.starts_with("--serve=") => {
                let port = parse_number("--serve", &arg["--serve=".len()..])?;
                return Ok(Command::Serve { port });
            }
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
        i += 1;
    }

    if let Some(name) = strategy_name {
        config.purchase_strategy =
            PurchaseStrategy::from_str(&name).map_err(CliError::InvalidStrategy)?;
    }
    match &mut config.purchase_strategy {
        PurchaseStrategy::AbacusGreedy {
            count_threshold,
            price_cutoff,
        } => {
            *count_threshold = abacus_count.unwrap_or(*count_threshold);
            *price_cutoff = abacus_cutoff.unwrap_or(*price_cutoff);
        }
        _ if abacus_count.is_some() || abacus_cutoff.is_some() => {
            return Err(CliError::AbacusWithoutStrategy)
        }
        _ => {}
    }

    Ok(Command::Run { config, save_json })
}

fn print_help() {
    println!("Taloon Shop Strategy Simulator");
    println!();
    println!("USAGE:");
    println!("    taloon-sim [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --start-gold <G>               Gold at the start (default: 29500)");
    println!("    --min-shop-gold <G>            Gold required before buying the shop (default: 35550)");
    println!("    --final-target <G>             Gold required after shop profits (default: 26000)");
    println!(
        "    --thresholds <a,b,c>           Armor offer thresholds, {}-{}",
        MIN_ARMOR_PRICE, MAX_ARMOR_PRICE
    );
    println!("    -n, --runs <N>                 Runs per threshold (default: 1000)");
    println!("    --nights <N>                   Nights slept per cycle (default: 3)");
    println!("    --two-sleep-threshold <N>      Sleep 2 nights when <= N items were added");
    println!("    --one-sleep-threshold <N>      Sleep 1 night when <= N items were added");
    println!("    --additional-trip-cutoff <G>   Leftover gold that justifies a second trip");
    println!("    --far-shop                     Allow purchases at the far shop");
    println!("    --sell-out-batches             Sell every plate batch to the last plate");
    println!("    --initial-walk                 First trip walks from the shop counter (50s flat)");
    println!("    -s, --seed <S>                 Random seed for reproducibility");
    println!("    --purchase-strategy <NAME>     greedy | max-spend | abacus-greedy");
    println!("    --abacus-count-threshold <N>   Abaci planned before skipping cheap items");
    println!("    --abacus-price-cutoff <G>      Skip non-abacus items at or below this cost");
    println!("    --time-bucket-seconds <N>      Histogram bucket width (default: 30)");
    println!("    --json                         Save JSON report");
    #[cfg(feature = "web")]
    println!("    --serve[=PORT]                 Serve the browser front end (default port: 3000)");
    println!("    -h, --help                     Show this help");
    println!();
    println!("Set RUST_LOG=debug for per-trial logging.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("taloon-sim")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    fn run_config(list: &[&str]) -> RunConfig {
        match parse_args(&args(list)).unwrap() {
            Command::Run { config, .. } => config,
            other => panic!("expected a run command, got {other:?}"),
        }
    }

    #[test]
    fn test_no_args_uses_defaults() {
        assert_eq!(
            parse_args(&args(&[])).unwrap(),
            Command::Run {
                config: RunConfig::default(),
                save_json: false
            }
        );
    }

    #[test]
    fn test_parse_core_flags() {
        let config = run_config(&[
            "--start-gold",
            "30000",
            "--thresholds",
            "1523, 1617",
            "--runs",
            "50",
            "--far-shop",
            "--seed",
            "9",
            "--additional-trip-cutoff",
            "2000",
        ]);
        assert_eq!(config.start_gold, 30000);
        assert_eq!(config.thresholds, vec![1523, 1617]);
        assert_eq!(config.runs, 50);
        assert!(config.use_far_shop);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.additional_trip_cutoff, Some(2000));
        assert!(!config.sell_out_batches);
        assert!(!config.initial_walk);
    }

    #[test]
    fn test_optional_mechanics_flags() {
        let config = run_config(&["--sell-out-batches", "--initial-walk"]);
        assert!(config.sell_out_batches);
        assert!(config.initial_walk);
    }

    #[test]
    fn test_threshold_outside_ladder_is_rejected() {
        assert!(matches!(
            parse_args(&args(&["--thresholds", "1700,2000"])),
            Err(CliError::Config(ConfigError::ThresholdOutOfRange {
                threshold: 2000,
                ..
            }))
        ));
    }

    #[test]
    fn test_non_integer_and_missing_values() {
        assert!(matches!(
            parse_args(&args(&["--runs", "lots"])),
            Err(CliError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--seed"])),
            Err(CliError::MissingValue { .. })
        ));
        assert!(matches!(
            parse_args(&args(&["--bogus"])),
            Err(CliError::UnknownArgument(_))
        ));
    }

    #[test]
    fn test_abacus_strategy_flags() {
        let config = run_config(&[
            "--purchase-strategy",
            "abacus-greedy",
            "--abacus-count-threshold",
            "6",
            "--abacus-price-cutoff",
            "500",
        ]);
        assert_eq!(
            config.purchase_strategy,
            PurchaseStrategy::AbacusGreedy {
                count_threshold: 6,
                price_cutoff: 500
            }
        );

        assert!(matches!(
            parse_args(&args(&["--abacus-price-cutoff", "500"])),
            Err(CliError::AbacusWithoutStrategy)
        ));
        assert!(matches!(
            parse_args(&args(&["--purchase-strategy", "cheapest"])),
            Err(CliError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_json_and_help() {
        assert!(matches!(
            parse_args(&args(&["--json"])).unwrap(),
            Command::Run {
                save_json: true,
                ..
            }
        ));
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
    }

    #[cfg(feature = "web")]
    #[test]
    fn test_serve_port() {
        assert_eq!(
            parse_args(&args(&["--serve"])).unwrap(),
            Command::Serve { port: DEFAULT_PORT }
        );
        assert_eq!(
            parse_args(&args(&["--serve=8080"])).unwrap(),
            Command::Serve { port: 8080 }
        );
    }
}
