//! Scale command implementation
//!
//! Sweeps worker counts for one use case and reports achieved against
//! theoretical speedup.

use tracing::info;

use infra_config::SimulationConfig;
use sampler_core::{IntegrationKernel, PiKernel, RunConfig};
use sampler_scaling::{KernelWorkload, ScalingAnalyzer, ScalingReport, Workload};
use service_report::Report;

use super::{finance, publish, report_sinks, UseCase};
use crate::Result;

/// Run the scale command
pub fn run(config: &SimulationConfig, use_case: UseCase) -> Result<()> {
    // Sweeps only measure; traces are never recorded.
    let mut config = config.clone();
    config.run.trace = false;

    let analyzer = config.scaling_analyzer(config.scaling.law)?;
    info!(
        use_case = ?use_case,
        law = %analyzer.law(),
        "Starting scaling analysis"
    );

    let report = match use_case {
        UseCase::Pi => sweep(&analyzer, &KernelWorkload::new(PiKernel), &config.run_config()?)?,
        UseCase::Integration => {
            let settings = &config.integration;
            let kernel = IntegrationKernel::new(
                settings.integrand.as_fn(),
                settings.lower_bound,
                settings.upper_bound,
                settings.probe_step,
            )?;
            sweep(&analyzer, &KernelWorkload::new(kernel), &config.run_config()?)?
        }
        UseCase::Finance => {
            let kernel = finance::kernel(&config)?;
            sweep(
                &analyzer,
                &KernelWorkload::new(kernel),
                &config.finance_run_config()?,
            )?
        }
    };

    let name = use_case_name(use_case);
    publish(
        &report_sinks(&config)?,
        &Report::Scaling {
            use_case: name,
            report: &report,
        },
    )
}

fn sweep<W: Workload>(
    analyzer: &ScalingAnalyzer,
    workload: &W,
    base: &RunConfig,
) -> Result<ScalingReport> {
    Ok(analyzer.run(workload, base)?)
}

fn use_case_name(use_case: UseCase) -> &'static str {
    match use_case {
        UseCase::Pi => "pi",
        UseCase::Integration => "integration",
        UseCase::Finance => "finance",
    }
}
