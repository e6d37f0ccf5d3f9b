//! Estimation of π by sampling the unit square.

use super::{OutputMode, SampleKernel, SamplePoint, ScalarEstimate, Tally};
use crate::aggregate::reduce_scaled;
use crate::error::Result;
use crate::rng::RandomSource;

/// Ratio between the unit square and the quarter circle inscribed in it.
const QUARTER_CIRCLE_SCALE: f64 = 4.0;

/// Counts uniform points of the unit square that fall inside the unit circle.
///
/// `π ≈ 4 × hits / samples`.
///
/// # Examples
///
/// ```rust
/// use sampler_core::kernel::{OutputMode, PiKernel, SampleKernel};
/// use sampler_core::rng::SamplerRng;
///
/// let mut rng = SamplerRng::from_seed(1);
/// let tally = PiKernel.sample(1_000, OutputMode::Measure, &mut rng).unwrap();
/// assert!(tally.hits <= 1_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PiKernel;

impl SampleKernel for PiKernel {
    type Partial = Tally;
    type Estimate = ScalarEstimate;

    fn name(&self) -> &'static str {
        "pi"
    }

    fn sample<R: RandomSource>(
        &self,
        samples: usize,
        output: OutputMode,
        rng: &mut R,
    ) -> Result<Tally> {
        let mut hits = 0;
        let mut trace = if output.is_trace() {
            Vec::with_capacity(samples)
        } else {
            Vec::new()
        };

        for _ in 0..samples {
            let x = rng.next_uniform();
            let y = rng.next_uniform();
            if x * x + y * y < 1.0 {
                hits += 1;
            }
            if output.is_trace() {
                trace.push(SamplePoint { x, y });
            }
        }

        Ok(Tally {
            hits,
            samples,
            trace,
        })
    }

    fn combine(&self, partials: Vec<Tally>) -> Result<ScalarEstimate> {
        reduce_scaled(partials, QUARTER_CIRCLE_SCALE)
    }
}
