//! Pi command implementation
//!
//! Estimates π with the quarter-circle kernel.

use std::f64::consts::PI;

use tracing::info;

use infra_config::SimulationConfig;
use sampler_core::{MonteCarloRunner, PiKernel};
use service_report::{EstimateSummary, Report};

use super::{publish, report_sinks};
use crate::Result;

/// Run the pi command
pub fn run(config: &SimulationConfig) -> Result<()> {
    let run = config.run_config()?;
    info!(
        samples = run.total_samples(),
        workers = run.worker_count(),
        mode = %run.mode(),
        "Estimating pi"
    );

    let estimate = MonteCarloRunner::run(&PiKernel, &run)?;
    let summary = EstimateSummary::scalar("pi", &estimate, Some(PI));

    let sinks = report_sinks(config)?;
    publish(&sinks, &Report::Estimate(&summary))?;
    if run.output().is_trace() {
        publish(
            &sinks,
            &Report::PointTrace {
                use_case: "pi",
                points: &estimate.value.trace,
            },
        )?;
    }

    Ok(())
}
