//! Taloon - shop strategy simulator library
//!
//! Estimates, by Monte Carlo simulation, how long it takes to sell iron
//! plates until a shop is affordable and then trade through Neta until a
//! final gold target is reached.

pub mod economy;
pub mod simulator;

#[cfg(feature = "web")]
pub mod web;

pub use simulator::{run_simulation, RunConfig, SimError, SimReport};

/// Install the stderr tracing subscriber used by the binaries.
///
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
