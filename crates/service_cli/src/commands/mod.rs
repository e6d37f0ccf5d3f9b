//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Estimation commands
//! publish their results to every sink returned by [`report_sinks`].

pub mod check;
pub mod finance;
pub mod integrate;
pub mod pi;
pub mod scale;

use clap::ValueEnum;

use infra_config::SimulationConfig;
use service_report::{ConsoleSink, FileWriter, Report, ReportSink};

use crate::Result;

/// Estimation use cases that can be swept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UseCase {
    /// π from the unit quarter circle
    Pi,
    /// Definite integral of the configured integrand
    Integration,
    /// Price paths from historical returns
    Finance,
}

/// Console output plus files under `output.dir`.
pub fn report_sinks(config: &SimulationConfig) -> Result<Vec<Box<dyn ReportSink>>> {
    Ok(vec![
        Box::new(ConsoleSink::stdout()),
        Box::new(FileWriter::new(&config.output.dir)?),
    ])
}

/// Sends `report` to every sink, stopping at the first failure.
pub fn publish(sinks: &[Box<dyn ReportSink>], report: &Report<'_>) -> Result<()> {
    for sink in sinks {
        sink.send(report)?;
    }
    Ok(())
}
