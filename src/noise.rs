//! Seedable 2D noise source.

use ::noise::{NoiseFn, OpenSimplex};
use rand::Rng as _;

/// Exclusive upper bound for seeds drawn when none is configured.
pub const RANDOM_SEED_LIMIT: u32 = 1 << 30;

/// Deterministic OpenSimplex field keyed by a seed.
///
/// Sampling takes `&self` and never advances any state, so any frame can be re-evaluated
/// alone and reproduce the same values.
#[derive(Clone, Debug)]
pub struct NoiseSource {
    field: OpenSimplex,
    seed: u32,
}

impl NoiseSource {
    /// Build a field for an explicit seed.
    pub fn new(seed: u32) -> Self {
        Self {
            field: OpenSimplex::new(seed),
            seed,
        }
    }

    /// Resolve `requested` (drawing a random seed when absent) and build the field.
    ///
    /// The resolved seed is available through [`NoiseSource::seed`] so callers can report it.
    pub fn from_requested(requested: Option<u32>) -> Self {
        Self::new(resolve_seed(requested))
    }

    /// Seed this field was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the field at `(x, y)`. Output lies in `[-1, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        self.field.get([x, y]).clamp(-1.0, 1.0)
    }
}

/// Return `requested` unchanged, or a fresh seed in `0..RANDOM_SEED_LIMIT`.
pub fn resolve_seed(requested: Option<u32>) -> u32 {
    requested.unwrap_or_else(|| rand::thread_rng().gen_range(0..RANDOM_SEED_LIMIT))
}

#[cfg(test)]
#[path = "../tests/unit/noise.rs"]
mod tests;
