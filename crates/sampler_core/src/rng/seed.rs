//! Per-share seed derivation.

/// Golden-ratio increment used to spread share indices across the seed space.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derives one independent seed per share from a base seed.
///
/// The derived seed depends only on `(base, share_index)`, never on which
/// thread runs the share or in what order shares complete.
///
/// # Examples
///
/// ```rust
/// use sampler_core::rng::SeedSequence;
///
/// let seeds = SeedSequence::new(7);
/// assert_eq!(seeds.seed_for(3), SeedSequence::new(7).seed_for(3));
/// assert_ne!(seeds.seed_for(0), seeds.seed_for(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeedSequence {
    base: u64,
}

impl SeedSequence {
    /// Creates a sequence rooted at `base`.
    #[inline]
    pub fn new(base: u64) -> Self {
        Self { base }
    }

    /// Returns the seed for the given share index (SplitMix64 finaliser).
    #[inline]
    pub fn seed_for(&self, share_index: usize) -> u64 {
        let mut z = self
            .base
            .wrapping_add(GOLDEN_GAMMA.wrapping_mul(share_index as u64 + 1));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl Default for SeedSequence {
    fn default() -> Self {
        Self::new(12345)
    }
}
