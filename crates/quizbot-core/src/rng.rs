//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests a seeded or scripted
//! implementation is injected so question selection is repeatable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Pick an index in `[0, len)` uniformly.
    ///
    /// Returns `0` for `len == 0`; callers guarantee a non-empty range.
    fn next_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let max = u32::try_from(len - 1).unwrap_or(u32::MAX);
        let picked = self.next_u32_range(0, max) as usize;
        picked.min(len - 1)
    }
}

/// Production RNG seeded from the operating system.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates an RNG with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}
