//! Seeded session RNG
//!
//! Every random decision in a session goes through this generator so that two
//! sessions with the same seed and the same inputs play out identically.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic generator bound to a 32-bit session seed
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u32,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed as u64),
        }
    }

    /// Draw a fresh session seed from the OS-seeded thread generator.
    ///
    /// Only the seed comes from here; nothing in a session reads external
    /// entropy afterwards.
    pub fn fresh_seed() -> u32 {
        rand::rng().next_u32()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Next float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in [0, n). Returns 0 for n == 0.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.inner.random_range(0..n)
    }

    /// Uniform integer in [lo, hi] (inclusive). Returns `lo` if the range is empty.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..=hi)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
