//! Strong and weak scaling sweeps.
//!
//! # Procedure
//!
//! 1. Run the workload serially on one worker at the base sample count N₀
//!    and record `serial_time`.
//! 2. For each worker count `w` in the range:
//!    - Amdahl: run N₀ in parallel on `w` workers,
//!      `achieved = serial_time / parallel_time`.
//!    - Gustafson: re-measure the serial reference at N₀·w, then run N₀·w in
//!      parallel on `w` workers, `achieved = serial(N₀·w) / parallel(N₀·w)`.
//! 3. Emit one [`ScalingRecord`] per `w`, ascending.

use serde::{Deserialize, Serialize};
use tracing::info;

use sampler_core::{
    ExecutionMode, MonteCarloRunner, Result, RunConfig, SampleKernel, SamplingError,
};

use crate::laws::{ScalingLaw, ScalingLawParameters};
use crate::record::ScalingRecord;

/// Default smallest swept worker count.
pub const DEFAULT_MIN_WORKERS: usize = 2;
/// Default largest swept worker count.
pub const DEFAULT_MAX_WORKERS: usize = 13;

/// Something that can be run once under a [`RunConfig`] and timed.
pub trait Workload {
    /// Runs once and returns the elapsed seconds.
    fn time_run(&self, config: &RunConfig) -> Result<f64>;
}

impl<F> Workload for F
where
    F: Fn(&RunConfig) -> Result<f64>,
{
    fn time_run(&self, config: &RunConfig) -> Result<f64> {
        self(config)
    }
}

/// Times a sampling kernel through [`MonteCarloRunner`].
#[derive(Clone, Debug)]
pub struct KernelWorkload<K> {
    kernel: K,
}

impl<K: SampleKernel> KernelWorkload<K> {
    /// Wraps a kernel.
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }
}

impl<K: SampleKernel> Workload for KernelWorkload<K> {
    fn time_run(&self, config: &RunConfig) -> Result<f64> {
        MonteCarloRunner::run(&self.kernel, config).map(|estimate| estimate.elapsed_seconds)
    }
}

/// Result of one sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingReport {
    /// Law the theoretical column was computed with.
    pub law: ScalingLaw,
    /// Serial and parallel fractions used.
    pub parameters: ScalingLawParameters,
    /// Sample count N₀ of the baseline.
    pub base_samples: usize,
    /// Elapsed seconds of the serial baseline at N₀.
    pub serial_time: f64,
    /// One row per worker count, ascending.
    pub records: Vec<ScalingRecord>,
}

impl ScalingReport {
    /// Returns the row with the highest achieved speedup.
    pub fn best(&self) -> Option<&ScalingRecord> {
        self.records
            .iter()
            .max_by(|a, b| a.achieved_speedup.total_cmp(&b.achieved_speedup))
    }
}

/// Sweeps worker counts and compares achieved speedup with a scaling law.
///
/// # Examples
///
/// ```rust
/// use sampler_core::{RunConfig, Result};
/// use sampler_scaling::{ScalingAnalyzer, ScalingLaw, ScalingLawParameters};
///
/// // Ideal workload: time is inversely proportional to the worker count.
/// let ideal = |config: &RunConfig| -> Result<f64> {
///     Ok(config.total_samples() as f64 / config.worker_count() as f64)
/// };
///
/// let base = RunConfig::builder().total_samples(1_000).build().unwrap();
/// let report = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
///     .with_range(2, 4)
///     .unwrap()
///     .run(&ideal, &base)
///     .unwrap();
///
/// assert_eq!(report.records.len(), 3);
/// assert_eq!(report.records[2].achieved_speedup, 4.0);
/// assert_eq!(report.records[2].theoretical_speedup, 4.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingAnalyzer {
    law: ScalingLaw,
    parameters: ScalingLawParameters,
    min_workers: usize,
    max_workers: usize,
    include_baseline: bool,
}

impl ScalingAnalyzer {
    /// Creates an analyzer sweeping the default range.
    pub fn new(law: ScalingLaw, parameters: ScalingLawParameters) -> Self {
        Self {
            law,
            parameters,
            min_workers: DEFAULT_MIN_WORKERS,
            max_workers: DEFAULT_MAX_WORKERS,
            include_baseline: false,
        }
    }

    /// Sets the inclusive worker range.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidParameter`] for an empty range, a zero
    /// lower end, or a range starting at 1 while the baseline row is
    /// requested.
    pub fn with_range(mut self, min_workers: usize, max_workers: usize) -> Result<Self> {
        self.min_workers = min_workers;
        self.max_workers = max_workers;
        self.validate()?;
        Ok(self)
    }

    /// Prepends the serial baseline as a `worker_count = 1` row.
    ///
    /// # Errors
    ///
    /// Same as [`ScalingAnalyzer::with_range`].
    pub fn with_baseline(mut self, include_baseline: bool) -> Result<Self> {
        self.include_baseline = include_baseline;
        self.validate()?;
        Ok(self)
    }

    /// Returns the scaling law.
    #[inline]
    pub fn law(&self) -> ScalingLaw {
        self.law
    }

    /// Returns the law parameters.
    #[inline]
    pub fn parameters(&self) -> ScalingLawParameters {
        self.parameters
    }

    /// Returns the swept worker counts.
    pub fn worker_counts(&self) -> std::ops::RangeInclusive<usize> {
        self.min_workers..=self.max_workers
    }

    fn validate(&self) -> Result<()> {
        if self.min_workers == 0 {
            return Err(SamplingError::invalid_parameter(
                "min_workers",
                "must be at least 1",
            ));
        }
        if self.min_workers > self.max_workers {
            return Err(SamplingError::invalid_parameter(
                "max_workers",
                format!(
                    "range {}..={} is empty",
                    self.min_workers, self.max_workers
                ),
            ));
        }
        if self.include_baseline && self.min_workers == 1 {
            return Err(SamplingError::invalid_parameter(
                "min_workers",
                "range starts at 1 while the baseline row is also requested",
            ));
        }
        Ok(())
    }

    /// Runs the sweep.
    ///
    /// `base` supplies N₀, the seed, the output mode and the thread cap; its
    /// worker count and execution mode are overridden per run.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidBudget`] if a run has more workers than
    ///   samples
    /// - [`SamplingError::InvalidParameter`] if N₀·w overflows
    /// - [`SamplingError::ArithmeticDegeneracy`] if a measured time is zero
    /// - any error of the workload itself
    pub fn run<W>(&self, workload: &W, base: &RunConfig) -> Result<ScalingReport>
    where
        W: Workload + ?Sized,
    {
        self.validate()?;
        let base_samples = base.total_samples();

        info!(
            law = %self.law,
            serial_fraction = self.parameters.serial_fraction(),
            base_samples,
            min_workers = self.min_workers,
            max_workers = self.max_workers,
            "starting scaling sweep"
        );

        let serial_time = self.time_serial(workload, base, base_samples)?;
        let mut records = Vec::with_capacity(self.max_workers - self.min_workers + 2);

        if self.include_baseline {
            records.push(ScalingRecord {
                worker_count: 1,
                achieved_speedup: speedup(serial_time, serial_time)?,
                theoretical_speedup: 1.0,
            });
        }

        for workers in self.worker_counts() {
            let (reference, samples) = match self.law {
                ScalingLaw::Amdahl => (serial_time, base_samples),
                ScalingLaw::Gustafson => {
                    let scaled = base_samples.checked_mul(workers).ok_or_else(|| {
                        SamplingError::invalid_parameter(
                            "total_samples",
                            format!("{} × {} workers overflows", base_samples, workers),
                        )
                    })?;
                    (self.time_serial(workload, base, scaled)?, scaled)
                }
            };

            let parallel = base
                .with_budget(samples, workers)?
                .with_mode(ExecutionMode::Parallel);
            let parallel_time = workload.time_run(&parallel)?;

            let record = ScalingRecord {
                worker_count: workers,
                achieved_speedup: speedup(reference, parallel_time)?,
                theoretical_speedup: self.parameters.theoretical_speedup(self.law, workers),
            };
            info!(
                workers,
                samples,
                achieved = record.achieved_speedup,
                theoretical = record.theoretical_speedup,
                "scaling point"
            );
            records.push(record);
        }

        Ok(ScalingReport {
            law: self.law,
            parameters: self.parameters,
            base_samples,
            serial_time,
            records,
        })
    }

    fn time_serial<W>(&self, workload: &W, base: &RunConfig, samples: usize) -> Result<f64>
    where
        W: Workload + ?Sized,
    {
        let serial = base.with_budget(samples, 1)?.with_mode(ExecutionMode::Serial);
        workload.time_run(&serial)
    }
}

/// Returns `serial / parallel`, rejecting zero or non-finite times.
pub fn speedup(serial_time: f64, parallel_time: f64) -> Result<f64> {
    let valid = |t: f64| t.is_finite() && t > 0.0;
    if !valid(serial_time) || !valid(parallel_time) {
        return Err(SamplingError::degenerate(
            "speedup",
            format!(
                "serial_time = {}, parallel_time = {}; both must be positive",
                serial_time, parallel_time
            ),
        ));
    }
    Ok(serial_time / parallel_time)
}
