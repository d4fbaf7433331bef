use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed integers.
///
/// The placer draws from it in a fixed order (x, then y, per attempt), so a seeded source
/// makes a whole session reproducible.
pub trait RandomSource {
    /// Returns a value in `min..=max`. Callers guarantee `min <= max`.
    fn next_in_range(&mut self, min: u32, max: u32) -> u32;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        (**self).next_in_range(min, max)
    }
}

/// Adapts any `rand::Rng` into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<StdRng> {
    /// Deterministic source for reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_in_range(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }
}
