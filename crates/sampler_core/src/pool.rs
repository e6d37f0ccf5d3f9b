//! Dispatch of per-share kernel calls.
//!
//! [`WorkerPool::execute`] runs a kernel once per share and returns the
//! partial results in share order, whichever order the shares finished in.
//!
//! # Execution modes
//!
//! - [`ExecutionMode::Serial`]: shares run one after another on the calling
//!   thread.
//! - [`ExecutionMode::Parallel`]: shares run on a dedicated rayon pool sized
//!   to the number of shares, or to the configured thread cap.
//!
//! Share `i` always draws from `SamplerRng::from_seed(seeds.seed_for(i))`,
//! so both modes consume identical random streams.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use tracing::debug;

use crate::config::ExecutionMode;
use crate::error::{Result, SamplingError};
use crate::kernel::{OutputMode, SampleKernel};
use crate::rng::{SamplerRng, SeedSequence};

/// Runs kernels over shares, serially or on a rayon thread pool.
///
/// # Examples
///
/// ```rust
/// use sampler_core::config::ExecutionMode;
/// use sampler_core::kernel::{OutputMode, PiKernel};
/// use sampler_core::pool::WorkerPool;
/// use sampler_core::rng::SeedSequence;
///
/// let pool = WorkerPool::new();
/// let partials = pool
///     .execute(&[500, 500], &PiKernel, &SeedSequence::new(1), ExecutionMode::Parallel, OutputMode::Measure)
///     .unwrap();
/// assert_eq!(partials.len(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerPool {
    thread_cap: Option<usize>,
}

impl WorkerPool {
    /// Creates a pool with one thread per share.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool limited to `thread_cap` threads.
    ///
    /// A cap of zero is treated as no cap.
    pub fn with_thread_cap(thread_cap: usize) -> Self {
        Self {
            thread_cap: (thread_cap > 0).then_some(thread_cap),
        }
    }

    /// Returns the thread cap, if any.
    #[inline]
    pub fn thread_cap(&self) -> Option<usize> {
        self.thread_cap
    }

    /// Returns the number of threads used for `share_count` shares.
    pub fn thread_count(&self, share_count: usize) -> usize {
        let threads = share_count.max(1);
        self.thread_cap.map_or(threads, |cap| threads.min(cap))
    }

    /// Runs `kernel` once per share.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::WorkerFailure`] if any share returns an error or
    ///   panics. The lowest failing share index is reported and no partial
    ///   results are returned.
    /// - [`SamplingError::PoolUnavailable`] if the thread pool cannot be
    ///   built.
    pub fn execute<K>(
        &self,
        shares: &[usize],
        kernel: &K,
        seeds: &SeedSequence,
        mode: ExecutionMode,
        output: OutputMode,
    ) -> Result<Vec<K::Partial>>
    where
        K: SampleKernel,
    {
        match mode {
            ExecutionMode::Serial => shares
                .iter()
                .enumerate()
                .map(|(index, &samples)| run_share(kernel, index, samples, seeds, output))
                .collect(),
            ExecutionMode::Parallel => {
                let threads = self.thread_count(shares.len());
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("mc-worker-{}", i))
                    .build()
                    .map_err(|e| SamplingError::PoolUnavailable(e.to_string()))?;

                debug!(
                    kernel = kernel.name(),
                    shares = shares.len(),
                    threads,
                    "dispatching shares to worker pool"
                );

                // Indexed collection keeps share order regardless of completion order.
                let outcomes: Vec<Result<K::Partial>> = pool.install(|| {
                    shares
                        .par_iter()
                        .enumerate()
                        .map(|(index, &samples)| run_share(kernel, index, samples, seeds, output))
                        .collect()
                });

                outcomes.into_iter().collect()
            }
        }
    }
}

fn run_share<K>(
    kernel: &K,
    index: usize,
    samples: usize,
    seeds: &SeedSequence,
    output: OutputMode,
) -> Result<K::Partial>
where
    K: SampleKernel,
{
    let mut rng = SamplerRng::from_seed(seeds.seed_for(index));
    debug!(kernel = kernel.name(), share = index, samples, "running share");

    match panic::catch_unwind(AssertUnwindSafe(|| kernel.sample(samples, output, &mut rng))) {
        Ok(Ok(partial)) => Ok(partial),
        Ok(Err(err)) => Err(SamplingError::WorkerFailure {
            share_index: index,
            message: err.to_string(),
        }),
        Err(payload) => Err(SamplingError::WorkerFailure {
            share_index: index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{PiKernel, Tally};
    use crate::rng::RandomSource;

    /// Returns the share size as its hit count and fails on chosen shares.
    struct Echo {
        fail_on: Vec<usize>,
        panic_on: Vec<usize>,
    }

    impl SampleKernel for Echo {
        type Partial = Tally;
        type Estimate = usize;

        fn name(&self) -> &'static str {
            "echo"
        }

        fn sample<R: RandomSource>(
            &self,
            samples: usize,
            _output: OutputMode,
            _rng: &mut R,
        ) -> Result<Tally> {
            if self.panic_on.contains(&samples) {
                panic!("share of {} samples", samples);
            }
            if self.fail_on.contains(&samples) {
                return Err(SamplingError::invalid_parameter("samples", "rejected"));
            }
            Ok(Tally {
                hits: samples,
                samples,
                trace: vec![],
            })
        }

        fn combine(&self, partials: Vec<Tally>) -> Result<usize> {
            Ok(partials.len())
        }
    }

    fn echo() -> Echo {
        Echo {
            fail_on: vec![],
            panic_on: vec![],
        }
    }

    #[test]
    fn test_results_follow_share_order() {
        let shares: Vec<usize> = (1..=16).collect();
        let seeds = SeedSequence::new(3);
        for mode in [ExecutionMode::Serial, ExecutionMode::Parallel] {
            let partials = WorkerPool::new()
                .execute(&shares, &echo(), &seeds, mode, OutputMode::Measure)
                .unwrap();
            let hits: Vec<usize> = partials.iter().map(|t| t.hits).collect();
            assert_eq!(hits, shares, "mode {}", mode);
        }
    }

    #[test]
    fn test_serial_and_parallel_draw_identical_streams() {
        let shares = vec![1_000; 6];
        let seeds = SeedSequence::new(99);
        let serial = WorkerPool::new()
            .execute(&shares, &PiKernel, &seeds, ExecutionMode::Serial, OutputMode::Measure)
            .unwrap();
        let parallel = WorkerPool::with_thread_cap(2)
            .execute(&shares, &PiKernel, &seeds, ExecutionMode::Parallel, OutputMode::Measure)
            .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_error_becomes_worker_failure() {
        let kernel = Echo {
            fail_on: vec![3],
            panic_on: vec![],
        };
        let err = WorkerPool::new()
            .execute(
                &[1, 2, 3, 4],
                &kernel,
                &SeedSequence::default(),
                ExecutionMode::Parallel,
                OutputMode::Measure,
            )
            .unwrap_err();
        assert_eq!(err.failed_share(), Some(2));
    }

    #[test]
    fn test_panic_is_caught_per_share() {
        let kernel = Echo {
            fail_on: vec![],
            panic_on: vec![2],
        };
        for mode in [ExecutionMode::Serial, ExecutionMode::Parallel] {
            let err = WorkerPool::new()
                .execute(&[1, 2, 3], &kernel, &SeedSequence::default(), mode, OutputMode::Measure)
                .unwrap_err();
            match err {
                SamplingError::WorkerFailure {
                    share_index,
                    message,
                } => {
                    assert_eq!(share_index, 1);
                    assert!(message.contains("share of 2 samples"));
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_lowest_failing_share_is_reported() {
        let kernel = Echo {
            fail_on: vec![5, 7],
            panic_on: vec![],
        };
        let shares: Vec<usize> = (1..=8).collect();
        let err = WorkerPool::new()
            .execute(
                &shares,
                &kernel,
                &SeedSequence::default(),
                ExecutionMode::Parallel,
                OutputMode::Measure,
            )
            .unwrap_err();
        assert_eq!(err.failed_share(), Some(4));
    }

    #[test]
    fn test_thread_count_respects_cap() {
        assert_eq!(WorkerPool::new().thread_count(8), 8);
        assert_eq!(WorkerPool::with_thread_cap(3).thread_count(8), 3);
        assert_eq!(WorkerPool::with_thread_cap(16).thread_count(8), 8);
        assert_eq!(WorkerPool::with_thread_cap(0).thread_cap(), None);
    }
}
