//! Definite integration by rejection sampling under a bounding rectangle.

use super::{OutputMode, SampleKernel, SamplePoint, ScalarEstimate, Tally};
use crate::aggregate::reduce_scaled;
use crate::error::{Result, SamplingError};
use crate::rng::RandomSource;

/// Upper bound on envelope probes, guarding against absurd step sizes.
pub const MAX_PROBES: usize = 10_000_000;

/// Bounding rectangle `[lower, upper] × [0, f_max]`.
///
/// `f_max` is the largest value of the integrand at the probe points
/// `lower, lower + step, lower + 2·step, …` strictly below `upper`. It is an
/// approximate envelope: peaks between probes, or at `upper` itself, can
/// exceed it, and the estimate is then clipped to the envelope there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    lower: f64,
    upper: f64,
    f_max: f64,
}

impl Envelope {
    /// Probes `f` over `[lower, upper)` at fixed steps.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidParameter`] for non-finite bounds,
    ///   `lower >= upper`, a non-positive step, or more than [`MAX_PROBES`]
    ///   probe points
    /// - [`SamplingError::ArithmeticDegeneracy`] if a probed value is not
    ///   finite or the envelope height is not positive
    pub fn probe<F>(f: &F, lower: f64, upper: f64, step: f64) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(SamplingError::invalid_parameter(
                "bounds",
                format!("[{}, {}] must be finite", lower, upper),
            ));
        }
        if lower >= upper {
            return Err(SamplingError::invalid_parameter(
                "bounds",
                format!("lower_bound {} must be below upper_bound {}", lower, upper),
            ));
        }
        if !(step > 0.0) || !step.is_finite() {
            return Err(SamplingError::invalid_parameter(
                "probe_step",
                format!("{} must be a positive finite number", step),
            ));
        }
        let probes = ((upper - lower) / step).ceil();
        if probes > MAX_PROBES as f64 {
            return Err(SamplingError::invalid_parameter(
                "probe_step",
                format!("{} yields {} probes, limit is {}", step, probes, MAX_PROBES),
            ));
        }

        let mut f_max = f(lower);
        let mut index = 1usize;
        loop {
            let x = lower + index as f64 * step;
            if x >= upper {
                break;
            }
            let value = f(x);
            if !value.is_finite() {
                return Err(SamplingError::degenerate(
                    "integration envelope",
                    format!("f({}) = {} is not finite", x, value),
                ));
            }
            if value > f_max {
                f_max = value;
            }
            index += 1;
        }

        if !f_max.is_finite() || f_max <= 0.0 {
            return Err(SamplingError::degenerate(
                "integration envelope",
                format!(
                    "f_max = {} over [{}, {}] with step {}; rejection sampling needs a positive height",
                    f_max, lower, upper, step
                ),
            ));
        }

        Ok(Self {
            lower,
            upper,
            f_max,
        })
    }

    /// Returns the lower integration bound.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper integration bound.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns the envelope height.
    #[inline]
    pub fn f_max(&self) -> f64 {
        self.f_max
    }

    /// Returns the rectangle area `(upper - lower) × f_max`.
    #[inline]
    pub fn area(&self) -> f64 {
        (self.upper - self.lower) * self.f_max
    }
}

/// Estimates `∫ f(x) dx` over `[lower, upper]` for non-negative `f`.
///
/// The envelope is computed once at construction and shared read-only by
/// every share.
///
/// # Examples
///
/// ```rust
/// use sampler_core::kernel::IntegrationKernel;
///
/// let kernel = IntegrationKernel::new(|x: f64| 2.0 * x, 1.0, 2.0, 0.01).unwrap();
/// assert!(kernel.envelope().f_max() > 3.9);
/// ```
pub struct IntegrationKernel<F> {
    integrand: F,
    envelope: Envelope,
}

impl<F> IntegrationKernel<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    /// Builds the kernel, probing the envelope with `probe_step`.
    ///
    /// # Errors
    ///
    /// See [`Envelope::probe`].
    pub fn new(integrand: F, lower: f64, upper: f64, probe_step: f64) -> Result<Self> {
        let envelope = Envelope::probe(&integrand, lower, upper, probe_step)?;
        Ok(Self {
            integrand,
            envelope,
        })
    }

    /// Returns the bounding rectangle.
    #[inline]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl<F> SampleKernel for IntegrationKernel<F>
where
    F: Fn(f64) -> f64 + Sync,
{
    type Partial = Tally;
    type Estimate = ScalarEstimate;

    fn name(&self) -> &'static str {
        "integration"
    }

    fn sample<R: RandomSource>(
        &self,
        samples: usize,
        output: OutputMode,
        rng: &mut R,
    ) -> Result<Tally> {
        let Envelope {
            lower,
            upper,
            f_max,
        } = self.envelope;
        let width = upper - lower;

        let mut hits = 0;
        let mut trace = if output.is_trace() {
            Vec::with_capacity(samples)
        } else {
            Vec::new()
        };

        for _ in 0..samples {
            let x = lower + width * rng.next_uniform();
            let y = f_max * rng.next_uniform();
            if y < (self.integrand)(x) {
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
        reduce_scaled(partials, self.envelope.area())
    }
}

impl<F> std::fmt::Debug for IntegrationKernel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationKernel")
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SamplerRng;
    use approx::assert_relative_eq;

    #[test]
    fn test_envelope_includes_left_endpoint() {
        // Decreasing integrand: the maximum sits at the lower bound.
        let env = Envelope::probe(&|x: f64| 10.0 - x, 1.0, 5.0, 0.5).unwrap();
        assert_relative_eq!(env.f_max(), 9.0);
        assert_relative_eq!(env.area(), 36.0);
    }

    #[test]
    fn test_envelope_excludes_upper_bound() {
        let env = Envelope::probe(&|x: f64| 2.0 * x, 1.0, 2.0, 0.25).unwrap();
        // Probes at 1.0, 1.25, 1.5, 1.75.
        assert_relative_eq!(env.f_max(), 3.5);
    }

    #[test]
    fn test_envelope_non_monotonic_peak_between_probes() {
        let f = |x: f64| 1.0 - (x - 0.3).powi(2);
        let env = Envelope::probe(&f, 0.0, 1.0, 0.25).unwrap();
        // Probes miss the true peak at 0.3; 0.25 is closest.
        assert_relative_eq!(env.f_max(), f(0.25));
        assert!(env.f_max() < 1.0);
    }

    #[test]
    fn test_envelope_rejects_inverted_bounds() {
        assert!(matches!(
            Envelope::probe(&|x: f64| x, 2.0, 1.0, 0.1),
            Err(SamplingError::InvalidParameter { name: "bounds", .. })
        ));
        assert!(Envelope::probe(&|x: f64| x, 1.0, 1.0, 0.1).is_err());
    }

    #[test]
    fn test_envelope_rejects_bad_step() {
        for step in [0.0, -0.1, f64::NAN, f64::INFINITY, 1e-12] {
            assert!(
                matches!(
                    Envelope::probe(&|x: f64| x, 1.0, 2.0, step),
                    Err(SamplingError::InvalidParameter { name: "probe_step", .. })
                ),
                "step {} accepted",
                step
            );
        }
    }

    #[test]
    fn test_envelope_degenerate_height() {
        assert!(matches!(
            Envelope::probe(&|_x: f64| 0.0, 0.0, 1.0, 0.1),
            Err(SamplingError::ArithmeticDegeneracy { .. })
        ));
        assert!(matches!(
            Envelope::probe(&|x: f64| -x, 1.0, 2.0, 0.1),
            Err(SamplingError::ArithmeticDegeneracy { .. })
        ));
    }

    #[test]
    fn test_envelope_non_finite_probe() {
        let f = |x: f64| if x > 1.5 { f64::INFINITY } else { x };
        assert!(matches!(
            Envelope::probe(&f, 1.0, 2.0, 0.1),
            Err(SamplingError::ArithmeticDegeneracy { .. })
        ));
    }

    #[test]
    fn test_samples_stay_inside_rectangle() {
        let kernel = IntegrationKernel::new(|x: f64| x * x, 0.0, 3.0, 0.01).unwrap();
        let mut rng = SamplerRng::from_seed(3);
        let tally = kernel.sample(2_000, OutputMode::Trace, &mut rng).unwrap();

        let env = kernel.envelope();
        for p in &tally.trace {
            assert!(p.x >= env.lower() && p.x < env.upper());
            assert!(p.y >= 0.0 && p.y < env.f_max());
        }
        let below = tally.trace.iter().filter(|p| p.y < p.x * p.x).count();
        assert_eq!(below, tally.hits);
    }

    #[test]
    fn test_constant_integrand_is_exact() {
        // Every point with y < f_max lies under a constant curve.
        let kernel = IntegrationKernel::new(|_x: f64| 2.5, -1.0, 3.0, 0.1).unwrap();
        let tally = kernel
            .sample(1_000, OutputMode::Measure, &mut SamplerRng::from_seed(1))
            .unwrap();
        assert_eq!(tally.hits, 1_000);
        let estimate = kernel.combine(vec![tally]).unwrap();
        assert_relative_eq!(estimate.value, 10.0, epsilon = 1e-12);
    }
}
