//! Variant selection for prompts with several templates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which of `len` prompt variants to speak.
///
/// Injected per request so tests can pin the output.
pub trait VariantPicker: Send + Sync {
    /// Return an index in `0..len`. Called only with `len >= 1`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Uniform random selection.
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send + Sync> VariantPicker for RandomPicker<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            self.rng.gen_range(0..len)
        }
    }
}

/// Always picks the same index, clamped to the last variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker {
    index: usize,
}

impl FixedPicker {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl VariantPicker for FixedPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }
}
