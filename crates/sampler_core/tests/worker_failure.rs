//! Failure of a single share aborts the whole batch.

use std::sync::atomic::{AtomicUsize, Ordering};

use sampler_core::rng::{RandomSource, SamplerRng, SeedSequence};
use sampler_core::{
    ExecutionMode, MonteCarloRunner, OutputMode, Result, RunConfig, SampleKernel, SamplingError,
};

const SEED: u64 = 5;

/// Fails on the share whose first uniform draw matches `failing_first_draw`.
///
/// Every share has the same size, so the share is identified by its random
/// stream rather than by its arguments.
struct SelectiveKernel {
    failing_first_draw: Option<f64>,
    panic: bool,
    combines: AtomicUsize,
}

impl SelectiveKernel {
    fn failing_on(share: usize, panic: bool) -> Self {
        let first = SamplerRng::from_seed(SeedSequence::new(SEED).seed_for(share)).next_uniform();
        Self {
            failing_first_draw: Some(first),
            panic,
            combines: AtomicUsize::new(0),
        }
    }

    fn healthy() -> Self {
        Self {
            failing_first_draw: None,
            panic: false,
            combines: AtomicUsize::new(0),
        }
    }
}

impl SampleKernel for SelectiveKernel {
    type Partial = usize;
    type Estimate = usize;

    fn name(&self) -> &'static str {
        "selective"
    }

    fn sample<R: RandomSource>(
        &self,
        samples: usize,
        _output: OutputMode,
        rng: &mut R,
    ) -> Result<usize> {
        if Some(rng.next_uniform()) == self.failing_first_draw {
            if self.panic {
                panic!("simulated crash");
            }
            return Err(SamplingError::invalid_parameter("share", "simulated failure"));
        }
        Ok(samples)
    }

    fn combine(&self, partials: Vec<usize>) -> Result<usize> {
        self.combines.fetch_add(1, Ordering::SeqCst);
        Ok(partials.iter().sum())
    }
}

fn config(mode: ExecutionMode) -> RunConfig {
    RunConfig::builder()
        .total_samples(800)
        .worker_count(8)
        .mode(mode)
        .seed(SEED)
        .build()
        .unwrap()
}

#[test]
fn test_failing_share_is_named_and_combine_never_runs() {
    for mode in [ExecutionMode::Serial, ExecutionMode::Parallel] {
        let kernel = SelectiveKernel::failing_on(6, false);
        let err = MonteCarloRunner::run(&kernel, &config(mode)).unwrap_err();

        assert_eq!(err.failed_share(), Some(6), "mode {}", mode);
        assert!(err.to_string().contains("simulated failure"));
        assert_eq!(kernel.combines.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn test_panicking_share_is_reported_as_worker_failure() {
    let kernel = SelectiveKernel::failing_on(2, true);
    let err = MonteCarloRunner::run(&kernel, &config(ExecutionMode::Parallel)).unwrap_err();

    match err {
        SamplingError::WorkerFailure {
            share_index,
            message,
        } => {
            assert_eq!(share_index, 2);
            assert!(message.contains("simulated crash"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(kernel.combines.load(Ordering::SeqCst), 0);
}

#[test]
fn test_healthy_kernel_combines_once() {
    let kernel = SelectiveKernel::healthy();
    let estimate = MonteCarloRunner::run(&kernel, &config(ExecutionMode::Parallel)).unwrap();
    assert_eq!(estimate.value, 800);
    assert_eq!(kernel.combines.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invalid_budget_fails_before_any_worker() {
    let err = RunConfig::builder()
        .total_samples(3)
        .worker_count(4)
        .build()
        .unwrap_err();
    assert!(matches!(err, SamplingError::InvalidBudget { .. }));
}
