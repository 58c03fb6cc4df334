use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Session random source. Seeded runs replay identically.
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { inner: ChaCha8Rng::from_entropy() }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    /// Uniform index in `[0, upper_inclusive]`.
    pub fn index_inclusive(&mut self, upper_inclusive: usize) -> usize {
        self.inner.gen_range(0..=upper_inclusive)
    }

    /// Uniform index in `[0, len)`; 0 for empty ranges.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    /// Uniform value in `[lo, hi)`; `lo` when the range is empty.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.inner.gen_range(lo..hi)
    }
}
