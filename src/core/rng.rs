use rand::prelude::*;

/// Source of uniform values in `[0, 1)` for particle attributes.
///
/// Any `rand` generator works; tests can plug in a scripted sequence.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform in `[min, max)`; collapses to `min` for an empty range.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min).max(0.0)
    }

    /// Index into a collection of `len` items; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64).floor() as usize).min(len.saturating_sub(1))
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

impl<R: RngCore> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seeded generator; the same seed yields the same particles.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from platform entropy (`getrandom`, which uses
/// `crypto.getRandomValues` in the browser).
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct Sequence {
    values: Vec<f64>,
    cursor: usize,
}

impl Sequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for Sequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
