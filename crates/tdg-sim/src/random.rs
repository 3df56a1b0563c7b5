//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Seedable random source threaded through generation."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{GenerationError, Result};

/// Largest accepted seed. Seeds are limited to the unsigned 32-bit range.
pub const MAX_SEED: i64 = u32::MAX as i64;

/// The single random stream used for a generation run.
///
/// Reproducibility depends on every draw happening in a fixed order, so the
/// source is passed explicitly to each stage instead of living in global state.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// Seed a deterministic source. Seeds outside `0..=MAX_SEED` are rejected.
    pub fn seeded(seed: i64) -> Result<Self> {
        if !(0..=MAX_SEED).contains(&seed) {
            return Err(GenerationError::RandomSource(format!(
                "seed must be between 0 and {MAX_SEED}, got {seed}"
            )));
        }
        let seed = seed as u64;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        })
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when `seed` is given, entropy-backed otherwise.
    pub fn new(seed: Option<i64>) -> Result<Self> {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Ok(Self::from_entropy()),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
