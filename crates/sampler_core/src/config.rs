//! Run configuration.
//!
//! This module provides [`RunConfig`] and its builder. A configuration that
//! builds successfully always describes a valid [`SampleBudget`].

use crate::error::{Result, SamplingError};
use crate::kernel::OutputMode;
use crate::partition::SampleBudget;
use crate::rng::SeedSequence;

/// Default base seed.
pub const DEFAULT_SEED: u64 = 12345;

/// How shares are dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExecutionMode {
    /// One share at a time on the calling thread.
    #[default]
    Serial,
    /// Every share on its own pool thread.
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serial => write!(f, "serial"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "parallel" => Ok(Self::Parallel),
            other => Err(SamplingError::invalid_parameter(
                "mode",
                format!("unknown execution mode '{}', expected serial or parallel", other),
            )),
        }
    }
}

/// Immutable description of one Monte Carlo run.
///
/// # Examples
///
/// ```rust
/// use sampler_core::config::{ExecutionMode, RunConfig};
///
/// let config = RunConfig::builder()
///     .total_samples(1_000_000)
///     .worker_count(4)
///     .mode(ExecutionMode::Parallel)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.budget().share_size(), 250_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    budget: SampleBudget,
    mode: ExecutionMode,
    output: OutputMode,
    seed: u64,
    thread_cap: Option<usize>,
}

impl RunConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Returns the validated budget.
    #[inline]
    pub fn budget(&self) -> SampleBudget {
        self.budget
    }

    /// Returns the requested total sample count.
    #[inline]
    pub fn total_samples(&self) -> usize {
        self.budget.total_samples()
    }

    /// Returns the worker count.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.budget.worker_count()
    }

    /// Returns the execution mode.
    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns the output mode.
    #[inline]
    pub fn output(&self) -> OutputMode {
        self.output
    }

    /// Returns the base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the per-share seed sequence.
    #[inline]
    pub fn seeds(&self) -> SeedSequence {
        SeedSequence::new(self.seed)
    }

    /// Returns the optional cap on pool threads.
    #[inline]
    pub fn thread_cap(&self) -> Option<usize> {
        self.thread_cap
    }

    /// Returns a copy with a different budget, keeping every other setting.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidBudget`] for an invalid budget.
    pub fn with_budget(&self, total_samples: usize, worker_count: usize) -> Result<Self> {
        Ok(Self {
            budget: SampleBudget::new(total_samples, worker_count)?,
            ..*self
        })
    }

    /// Returns a copy with a different execution mode.
    pub fn with_mode(&self, mode: ExecutionMode) -> Self {
        Self { mode, ..*self }
    }
}

/// Builder for [`RunConfig`].
#[derive(Clone, Debug, Default)]
pub struct RunConfigBuilder {
    total_samples: Option<usize>,
    worker_count: Option<usize>,
    mode: ExecutionMode,
    output: OutputMode,
    seed: Option<u64>,
    thread_cap: Option<usize>,
}

impl RunConfigBuilder {
    /// Sets the total sample count.
    #[inline]
    pub fn total_samples(mut self, total_samples: usize) -> Self {
        self.total_samples = Some(total_samples);
        self
    }

    /// Sets the worker count (defaults to 1).
    #[inline]
    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = Some(worker_count);
        self
    }

    /// Sets the execution mode.
    #[inline]
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the output mode.
    #[inline]
    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Sets the base seed (defaults to [`DEFAULT_SEED`]).
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Caps the number of pool threads used in parallel mode.
    #[inline]
    pub fn thread_cap(mut self, thread_cap: usize) -> Self {
        self.thread_cap = Some(thread_cap);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidParameter`] if `total_samples` is not set or
    ///   `thread_cap` is zero
    /// - [`SamplingError::InvalidBudget`] for an invalid budget
    pub fn build(self) -> Result<RunConfig> {
        let total_samples = self
            .total_samples
            .ok_or_else(|| SamplingError::invalid_parameter("total_samples", "must be specified"))?;
        let worker_count = self.worker_count.unwrap_or(1);

        if self.thread_cap == Some(0) {
            return Err(SamplingError::invalid_parameter(
                "thread_cap",
                "must be positive when set",
            ));
        }

        Ok(RunConfig {
            budget: SampleBudget::new(total_samples, worker_count)?,
            mode: self.mode,
            output: self.output,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            thread_cap: self.thread_cap,
        })
    }
}
