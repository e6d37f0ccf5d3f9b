//! # Random Number Generation
//!
//! Seeded random sources for the sampling kernels.
//!
//! ## Design
//!
//! - **Injected, never global**: kernels receive a `&mut impl RandomSource`
//!   for each share, so a fixed seed makes every share reproducible
//! - **Per-share streams**: [`SeedSequence`] derives one seed per share index,
//!   so serial and parallel executions of the same budget draw identical
//!   numbers share by share
//! - **Static dispatch**: kernels are generic over the source; no
//!   `Box<dyn Trait>` in the sampling loop
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::rng::{RandomSource, SamplerRng, SeedSequence};
//!
//! let seeds = SeedSequence::new(42);
//! let mut rng = SamplerRng::from_seed(seeds.seed_for(0));
//!
//! let u = rng.next_uniform();
//! assert!((0.0..1.0).contains(&u));
//!
//! let z = rng.next_normal();
//! assert!(z.is_finite());
//! ```

mod prng;
mod seed;

pub use prng::{RandomSource, SamplerRng};
pub use seed::SeedSequence;
