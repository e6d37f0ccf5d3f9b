//! Integrate command implementation
//!
//! Estimates the integral of a named integrand by rejection sampling under
//! its probed envelope.

use tracing::info;

use infra_config::SimulationConfig;
use sampler_core::{IntegrationKernel, MonteCarloRunner};
use service_report::{EstimateSummary, Report};

use super::{publish, report_sinks};
use crate::Result;

const USE_CASE: &str = "integration";

/// Run the integrate command
pub fn run(config: &SimulationConfig) -> Result<()> {
    let settings = &config.integration;
    let kernel = IntegrationKernel::new(
        settings.integrand.as_fn(),
        settings.lower_bound,
        settings.upper_bound,
        settings.probe_step,
    )?;
    let run = config.run_config()?;

    info!(
        integrand = %settings.integrand.formula(),
        lower = settings.lower_bound,
        upper = settings.upper_bound,
        f_max = kernel.envelope().f_max(),
        samples = run.total_samples(),
        workers = run.worker_count(),
        "Estimating integral"
    );

    let estimate = MonteCarloRunner::run(&kernel, &run)?;
    let reference = settings
        .integrand
        .exact_integral(settings.lower_bound, settings.upper_bound);
    let summary = EstimateSummary::scalar(USE_CASE, &estimate, reference);

    let sinks = report_sinks(config)?;
    publish(&sinks, &Report::Estimate(&summary))?;
    if run.output().is_trace() {
        publish(
            &sinks,
            &Report::PointTrace {
                use_case: USE_CASE,
                points: &estimate.value.trace,
            },
        )?;
    }

    Ok(())
}
