//! Per-trial seed derivation.
//!
//! Every trial gets its own stream, derived from the experiment's base seed,
//! the threshold under test and the run index via SHA-256. The derivation is
//! stable across processes and platforms.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Resolve the experiment's base seed. `None` draws fresh OS entropy, so the
/// run is not reproducible unless the returned value is reused.
pub fn resolve_base_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Seed for one trial.
pub fn trial_seed(base_seed: u64, threshold: u32, run_index: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(threshold.to_le_bytes());
    hasher.update(run_index.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Random stream owned by one trial.
pub fn trial_rng(base_seed: u64, threshold: u32, run_index: u32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(trial_seed(base_seed, threshold, run_index))
}
