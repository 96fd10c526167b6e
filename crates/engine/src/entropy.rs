//! Entropy sources for the random-split allocator.
//!
//! On chain this randomness would come from block-level entropy; here the
//! source is injected so tests can pin seeds and assert exact payout
//! sequences.

use hongbao_core::EntropySource;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

/// Deterministic entropy from a fixed seed.
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn next_random(&mut self) -> u128 {
        self.rng.gen()
    }
}

/// Operating-system entropy.
#[derive(Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_random(&mut self) -> u128 {
        OsRng.gen()
    }
}
