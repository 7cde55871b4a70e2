// ── Random generators ──
//
// Thin helpers over any `rand::Rng`. Seeded runs use `ChaCha8Rng` so a
// given seed reproduces the same node set and series on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform draws used by the synthesizer and the series generator.
#[derive(Debug, Clone)]
pub struct Random<R = ChaCha8Rng> {
    rng: R,
}

impl Random<ChaCha8Rng> {
    /// Deterministic source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl<R: Rng> Random<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform real in `[min, max)`. A degenerate range yields `min`.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max.partial_cmp(&min) != Some(std::cmp::Ordering::Greater) {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform pick from a slice; `None` only when it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.rng.gen_range(0..items.len()))
    }

    /// Uniform real in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
