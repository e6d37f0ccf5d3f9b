//! Theoretical speedup bounds.
//!
//! | Law | Scaling | Speedup on `w` workers |
//! |-----|---------|------------------------|
//! | Amdahl | strong (fixed N) | `1 / (s + p/w)` |
//! | Gustafson | weak (N grows with w) | `s + p·w` |
//!
//! Amdahl's bound is evaluated as the algebraically identical `w / (s·w + p)`
//! so that `s = 0` yields exactly `w`.

use serde::{Deserialize, Serialize};

use sampler_core::{Result, SamplingError};

/// Tolerance on `s + p = 1`.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

/// Which scaling law bounds the sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingLaw {
    /// Strong scaling: fixed total samples.
    #[default]
    Amdahl,
    /// Weak scaling: total samples grow with the worker count.
    Gustafson,
}

impl std::fmt::Display for ScalingLaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amdahl => write!(f, "amdahl"),
            Self::Gustafson => write!(f, "gustafson"),
        }
    }
}

impl std::str::FromStr for ScalingLaw {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "amdahl" | "strong" => Ok(Self::Amdahl),
            "gustafson" | "weak" => Ok(Self::Gustafson),
            other => Err(SamplingError::invalid_parameter(
                "scaling_law",
                format!("unknown law '{}', expected amdahl or gustafson", other),
            )),
        }
    }
}

/// Serial fraction `s` and parallel fraction `p` of a workload.
///
/// # Examples
///
/// ```rust
/// use sampler_scaling::{ScalingLaw, ScalingLawParameters};
///
/// let params = ScalingLawParameters::new(0.1, 0.9).unwrap();
/// let bound = params.theoretical_speedup(ScalingLaw::Amdahl, 4);
/// assert!((bound - 1.0 / (0.1 + 0.9 / 4.0)).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingLawParameters {
    serial_fraction: f64,
    parallel_fraction: f64,
}

impl ScalingLawParameters {
    /// Validates the fractions.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidParameter`] if either fraction lies
    /// outside `[0, 1]` or they do not sum to 1 within
    /// [`FRACTION_TOLERANCE`].
    pub fn new(serial_fraction: f64, parallel_fraction: f64) -> Result<Self> {
        for (name, value) in [
            ("serial_fraction", serial_fraction),
            ("parallel_fraction", parallel_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SamplingError::invalid_parameter(
                    name,
                    format!("{} must lie in [0, 1]", value),
                ));
            }
        }
        if (serial_fraction + parallel_fraction - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(SamplingError::invalid_parameter(
                "parallel_fraction",
                format!(
                    "serial_fraction {} + parallel_fraction {} must equal 1",
                    serial_fraction, parallel_fraction
                ),
            ));
        }

        Ok(Self {
            serial_fraction,
            parallel_fraction,
        })
    }

    /// Builds parameters from the serial fraction alone.
    pub fn from_serial_fraction(serial_fraction: f64) -> Result<Self> {
        Self::new(serial_fraction, 1.0 - serial_fraction)
    }

    /// Returns `s`.
    #[inline]
    pub fn serial_fraction(&self) -> f64 {
        self.serial_fraction
    }

    /// Returns `p`.
    #[inline]
    pub fn parallel_fraction(&self) -> f64 {
        self.parallel_fraction
    }

    /// Amdahl bound for `workers` workers.
    pub fn amdahl(&self, workers: usize) -> f64 {
        let w = workers as f64;
        w / (self.serial_fraction * w + self.parallel_fraction)
    }

    /// Gustafson bound for `workers` workers.
    pub fn gustafson(&self, workers: usize) -> f64 {
        self.serial_fraction + self.parallel_fraction * workers as f64
    }

    /// Bound under `law` for `workers` workers.
    pub fn theoretical_speedup(&self, law: ScalingLaw, workers: usize) -> f64 {
        match law {
            ScalingLaw::Amdahl => self.amdahl(workers),
            ScalingLaw::Gustafson => self.gustafson(workers),
        }
    }
}

impl Default for ScalingLawParameters {
    /// Perfectly parallel workload: `s = 0`, `p = 1`.
    fn default() -> Self {
        Self {
            serial_fraction: 0.0,
            parallel_fraction: 1.0,
        }
    }
}
