//! Pseudo-random number generator wrapper for sampling kernels.
//!
//! This module provides [`SamplerRng`], a seeded PRNG wrapper, and the
//! [`RandomSource`] capability that kernels are written against.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Source of random variates injected into a kernel.
///
/// Kernels never reach for a thread-local or global generator; whatever
/// implements this trait is the only randomness they see.
pub trait RandomSource {
    /// Returns a uniform variate in [0, 1).
    fn next_uniform(&mut self) -> f64;

    /// Returns a standard normal variate (mean 0, standard deviation 1).
    fn next_normal(&mut self) -> f64;
}

/// Seeded random number generator for Monte Carlo shares.
///
/// # Examples
///
/// ```rust
/// use sampler_core::rng::{RandomSource, SamplerRng};
///
/// let mut rng1 = SamplerRng::from_seed(12345);
/// let mut rng2 = SamplerRng::from_seed(12345);
///
/// // Same seed produces identical sequences
/// assert_eq!(rng1.next_uniform(), rng2.next_uniform());
/// ```
pub struct SamplerRng {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed used for initialisation.
    seed: u64,
}

impl SamplerRng {
    /// Creates a new generator initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }
}

impl RandomSource for SamplerRng {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    #[inline]
    fn next_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }
}

impl std::fmt::Debug for SamplerRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerRng").field("seed", &self.seed).finish()
    }
}
