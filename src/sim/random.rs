//! Seeded randomness helpers
//!
//! Every random draw in the simulation goes through a `Pcg32` seeded from
//! the run seed, so equal seeds replay identically.

use anyhow::ensure;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// RNG seed wrapper, one stream per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Derive a sibling state for another subsystem
    pub fn with_stream(self, stream: u64) -> Self {
        Self { stream, ..self }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream.wrapping_mul(2).wrapping_add(1))
    }
}

/// Roll an event with probability `numerator / denominator`.
///
/// The arguments are checked, not clamped: a negative numerator, a
/// non-positive denominator or a numerator above the denominator is a
/// caller bug and returns an error.
pub fn is_in_probability<R: Rng>(
    rng: &mut R,
    numerator: i32,
    denominator: i32,
) -> anyhow::Result<bool> {
    ensure!(
        denominator > 0,
        "probability denominator must be positive, got {denominator}"
    );
    ensure!(
        (0..=denominator).contains(&numerator),
        "probability numerator must be in 0..={denominator}, got {numerator}"
    );
    Ok(rng.random::<f64>() < numerator as f64 / denominator as f64)
}

/// Uniform integer in `[min, max)`. Reversed bounds are swapped; equal
/// bounds return `min`.
pub fn random_number<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return lo;
    }
    rng.random_range(lo..hi)
}

/// Build a generator straight from a seed (tests and tools)
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
