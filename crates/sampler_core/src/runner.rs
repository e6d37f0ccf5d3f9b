//! Single Monte Carlo runs: partition, dispatch, combine and time.

use tracing::{info, warn};

use crate::config::{ExecutionMode, RunConfig};
use crate::error::Result;
use crate::kernel::SampleKernel;
use crate::pool::WorkerPool;
use crate::timer::try_measure;

/// Output of one run together with how it was produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Estimate<T> {
    /// Kernel-specific result.
    pub value: T,
    /// Samples actually drawn (`worker_count × share_size`).
    pub samples_drawn: usize,
    /// Number of shares.
    pub worker_count: usize,
    /// How the shares were dispatched.
    pub mode: ExecutionMode,
    /// Wall-clock seconds for dispatch plus aggregation.
    pub elapsed_seconds: f64,
}

/// Runs kernels according to a [`RunConfig`].
///
/// # Examples
///
/// ```rust
/// use sampler_core::config::{ExecutionMode, RunConfig};
/// use sampler_core::kernel::PiKernel;
/// use sampler_core::runner::MonteCarloRunner;
///
/// let config = RunConfig::builder()
///     .total_samples(200_000)
///     .worker_count(4)
///     .mode(ExecutionMode::Parallel)
///     .build()
///     .unwrap();
///
/// let estimate = MonteCarloRunner::run(&PiKernel, &config).unwrap();
/// assert!((estimate.value.value - std::f64::consts::PI).abs() < 0.05);
/// ```
#[derive(Debug)]
pub struct MonteCarloRunner;

impl MonteCarloRunner {
    /// Partitions the budget, runs every share and combines the partials.
    ///
    /// The budget is partitioned before any worker starts. Only
    /// `execute + combine` is timed.
    ///
    /// # Errors
    ///
    /// Propagates partitioning, worker and aggregation errors unchanged.
    pub fn run<K>(kernel: &K, config: &RunConfig) -> Result<Estimate<K::Estimate>>
    where
        K: SampleKernel,
    {
        let budget = config.budget();
        let shares = budget.shares();

        if budget.residual() > 0 {
            warn!(
                kernel = kernel.name(),
                total_samples = budget.total_samples(),
                worker_count = budget.worker_count(),
                residual = budget.residual(),
                "discarding samples that do not divide evenly across workers"
            );
        }

        info!(
            kernel = kernel.name(),
            samples = budget.samples_drawn(),
            workers = budget.worker_count(),
            mode = %config.mode(),
            seed = config.seed(),
            "starting Monte Carlo run"
        );

        let pool = config
            .thread_cap()
            .map_or_else(WorkerPool::new, WorkerPool::with_thread_cap);
        let seeds = config.seeds();

        let (value, elapsed_seconds) = try_measure(|| {
            let partials = pool.execute(&shares, kernel, &seeds, config.mode(), config.output())?;
            kernel.combine(partials)
        })?;

        info!(
            kernel = kernel.name(),
            elapsed_seconds,
            "finished Monte Carlo run"
        );

        Ok(Estimate {
            value,
            samples_drawn: budget.samples_drawn(),
            worker_count: budget.worker_count(),
            mode: config.mode(),
            elapsed_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{FinanceKernel, OutputMode, PiKernel};

    #[test]
    fn test_residual_is_discarded() {
        let config = RunConfig::builder()
            .total_samples(1_003)
            .worker_count(4)
            .build()
            .unwrap();
        let estimate = MonteCarloRunner::run(&PiKernel, &config).unwrap();
        assert_eq!(estimate.samples_drawn, 1_000);
        assert_eq!(estimate.value.samples, 1_000);
        assert_eq!(estimate.worker_count, 4);
    }

    #[test]
    fn test_trace_mode_collects_every_point() {
        let config = RunConfig::builder()
            .total_samples(600)
            .worker_count(3)
            .mode(ExecutionMode::Parallel)
            .output(OutputMode::Trace)
            .build()
            .unwrap();
        let estimate = MonteCarloRunner::run(&PiKernel, &config).unwrap();
        assert_eq!(estimate.value.trace.len(), 600);
    }

    #[test]
    fn test_finance_paths_per_share() {
        let kernel = FinanceKernel::new(100.0, 0.0, 0.01, 10).unwrap();
        let config = RunConfig::builder()
            .total_samples(20)
            .worker_count(5)
            .mode(ExecutionMode::Parallel)
            .build()
            .unwrap();
        let estimate = MonteCarloRunner::run(&kernel, &config).unwrap();
        assert_eq!(estimate.value.len(), 20);
        assert_eq!(estimate.mode, ExecutionMode::Parallel);
        assert!(estimate.elapsed_seconds >= 0.0);
    }
}
