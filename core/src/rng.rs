//! Tie-break randomness for the ranked allocation.
//!
//! RULE: The engine never calls a platform RNG directly.
//! Every shuffle flows through a `TieBreak` handed to the engine, so
//! tests can pin the permutation with a seed or switch it off entirely.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Reorders a candidate pool before the stable ranking sort.
pub trait TieBreak {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Fisher–Yates shuffle over a seedable PCG stream.
pub struct SeededShuffle {
    pub seed: Option<u64>,
    inner: Pcg64Mcg,
}

impl SeededShuffle {
    /// Reproducible stream: same seed, same permutations.
    pub fn new(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Non-reproducible stream for production runs.
    pub fn from_entropy() -> Self {
        Self {
            seed: None,
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    /// Roll a u64 in [0, n) without modulo bias.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        // Reject the tail of the range that would over-represent low values.
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let bits = self.inner.next_u64();
            if bits < zone {
                return bits % n;
            }
        }
    }
}

impl TieBreak for SeededShuffle {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_u64_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Leaves the pool in roster order. Residual ties then resolve by roster
/// position, which makes every run identical.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShuffle;

impl TieBreak for NoShuffle {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}
