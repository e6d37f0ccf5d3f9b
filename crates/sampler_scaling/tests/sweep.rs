//! Scaling sweeps against deterministic workloads.
//!
//! The fake workloads compute their "elapsed time" from the configuration
//! instead of measuring it, so achieved speedups are exact.

use std::cell::RefCell;

use approx::assert_relative_eq;
use sampler_core::{ExecutionMode, PiKernel, Result, RunConfig, SamplingError};
use sampler_scaling::{
    KernelWorkload, ScalingAnalyzer, ScalingLaw, ScalingLawParameters, Workload, CSV_HEADER,
};

/// Workload with a serial fraction `s`: `t = N × (s + (1 - s) / w)`.
fn amdahl_workload(s: f64) -> impl Fn(&RunConfig) -> Result<f64> {
    move |config: &RunConfig| {
        let w = config.worker_count() as f64;
        Ok(config.total_samples() as f64 * (s + (1.0 - s) / w))
    }
}

/// Records every configuration it is asked to run.
struct Recorder {
    calls: RefCell<Vec<(usize, usize, ExecutionMode)>>,
}

impl Workload for Recorder {
    fn time_run(&self, config: &RunConfig) -> Result<f64> {
        self.calls
            .borrow_mut()
            .push((config.total_samples(), config.worker_count(), config.mode()));
        Ok(1.0)
    }
}

fn base(total: usize) -> RunConfig {
    RunConfig::builder().total_samples(total).seed(3).build().unwrap()
}

// ============================================================================
// Strong scaling (Amdahl)
// ============================================================================

#[test]
fn test_perfect_workload_reaches_amdahl_bound() {
    let report = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .run(&amdahl_workload(0.0), &base(1_200))
        .unwrap();

    let counts: Vec<usize> = report.records.iter().map(|r| r.worker_count).collect();
    assert_eq!(counts, (2..=13).collect::<Vec<_>>());
    for record in &report.records {
        assert_eq!(record.theoretical_speedup, record.worker_count as f64);
        assert_relative_eq!(record.achieved_speedup, record.worker_count as f64, epsilon = 1e-12);
    }
}

#[test]
fn test_serial_fraction_caps_achieved_speedup() {
    let params = ScalingLawParameters::new(0.2, 0.8).unwrap();
    let report = ScalingAnalyzer::new(ScalingLaw::Amdahl, params)
        .with_range(2, 8)
        .unwrap()
        .run(&amdahl_workload(0.2), &base(1_000))
        .unwrap();

    for record in &report.records {
        assert_relative_eq!(
            record.achieved_speedup,
            record.theoretical_speedup,
            epsilon = 1e-12
        );
        assert!(record.achieved_speedup < 5.0);
        assert_relative_eq!(record.karp_flatt().unwrap(), 0.2, epsilon = 1e-9);
    }
}

#[test]
fn test_strong_scaling_keeps_total_fixed() {
    let recorder = Recorder {
        calls: RefCell::new(Vec::new()),
    };
    ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .with_range(2, 4)
        .unwrap()
        .run(&recorder, &base(100))
        .unwrap();

    assert_eq!(
        recorder.calls.into_inner(),
        vec![
            (100, 1, ExecutionMode::Serial),
            (100, 2, ExecutionMode::Parallel),
            (100, 3, ExecutionMode::Parallel),
            (100, 4, ExecutionMode::Parallel),
        ]
    );
}

// ============================================================================
// Weak scaling (Gustafson)
// ============================================================================

#[test]
fn test_weak_scaling_remeasures_serial_reference() {
    let recorder = Recorder {
        calls: RefCell::new(Vec::new()),
    };
    ScalingAnalyzer::new(ScalingLaw::Gustafson, ScalingLawParameters::default())
        .with_range(2, 3)
        .unwrap()
        .run(&recorder, &base(100))
        .unwrap();

    assert_eq!(
        recorder.calls.into_inner(),
        vec![
            (100, 1, ExecutionMode::Serial),
            (200, 1, ExecutionMode::Serial),
            (200, 2, ExecutionMode::Parallel),
            (300, 1, ExecutionMode::Serial),
            (300, 3, ExecutionMode::Parallel),
        ]
    );
}

#[test]
fn test_gustafson_perfect_workload() {
    let report = ScalingAnalyzer::new(ScalingLaw::Gustafson, ScalingLawParameters::default())
        .with_range(2, 6)
        .unwrap()
        .run(&amdahl_workload(0.0), &base(500))
        .unwrap();

    for record in &report.records {
        assert_eq!(record.theoretical_speedup, record.worker_count as f64);
        assert_relative_eq!(record.achieved_speedup, record.worker_count as f64, epsilon = 1e-12);
    }
}

// ============================================================================
// Baseline row and degeneracies
// ============================================================================

#[test]
fn test_baseline_row_is_exactly_one() {
    for law in [ScalingLaw::Amdahl, ScalingLaw::Gustafson] {
        let report = ScalingAnalyzer::new(law, ScalingLawParameters::new(0.3, 0.7).unwrap())
            .with_range(2, 3)
            .unwrap()
            .with_baseline(true)
            .unwrap()
            .run(&amdahl_workload(0.3), &base(999))
            .unwrap();

        let first = report.records[0];
        assert_eq!(first.worker_count, 1);
        assert_eq!(first.achieved_speedup, 1.0);
        assert_eq!(first.theoretical_speedup, 1.0);
        assert_eq!(report.records.len(), 3);
    }
}

#[test]
fn test_zero_parallel_time_is_degenerate() {
    let instant = |config: &RunConfig| -> Result<f64> {
        Ok(match config.mode() {
            ExecutionMode::Serial => 1.0,
            ExecutionMode::Parallel => 0.0,
        })
    };
    let err = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .run(&instant, &base(100))
        .unwrap_err();
    assert!(matches!(err, SamplingError::ArithmeticDegeneracy { .. }));
}

#[test]
fn test_too_many_workers_for_base_samples() {
    let err = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .with_range(2, 8)
        .unwrap()
        .run(&amdahl_workload(0.0), &base(4))
        .unwrap_err();
    assert!(matches!(err, SamplingError::InvalidBudget { .. }));
}

#[test]
fn test_workload_error_propagates() {
    let failing = |_: &RunConfig| -> Result<f64> {
        Err(SamplingError::data_unavailable("XYZ", "no rows"))
    };
    let err = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .run(&failing, &base(100))
        .unwrap_err();
    assert!(matches!(err, SamplingError::DataUnavailable { .. }));
}

// ============================================================================
// Real kernel and record shape
// ============================================================================

#[test]
fn test_kernel_workload_produces_positive_speedups() {
    let report = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
        .with_range(2, 3)
        .unwrap()
        .run(&KernelWorkload::new(PiKernel), &base(400_000))
        .unwrap();

    assert_eq!(report.records.len(), 2);
    assert!(report.serial_time > 0.0);
    assert!(report.records.iter().all(|r| r.achieved_speedup > 0.0));
}

#[test]
fn test_csv_header_field_order() {
    assert_eq!(
        CSV_HEADER.join(","),
        "worker_count,achieved_speedup,theoretical_speedup"
    );
}
