//! Finance command implementation
//!
//! Loads price history, derives daily return statistics and simulates
//! price paths from the last close.

use tracing::info;

use adapter_prices::{load_statistics, CsvPriceSource, PriceSource, SyntheticPriceSource};
use infra_config::{PriceSourceKind, SimulationConfig};
use sampler_core::{FinanceKernel, MonteCarloRunner};
use service_report::{EstimateSummary, Report};

use super::{publish, report_sinks};
use crate::Result;

/// Builds the configured price source.
pub fn price_source(config: &SimulationConfig) -> Box<dyn PriceSource> {
    match config.finance.source {
        PriceSourceKind::Csv => Box::new(CsvPriceSource::new(&config.finance.data_dir)),
        PriceSourceKind::Synthetic => Box::new(SyntheticPriceSource::default()),
    }
}

/// Builds the path kernel from the configured history.
pub fn kernel(config: &SimulationConfig) -> Result<FinanceKernel> {
    let finance = &config.finance;
    let source = price_source(config);
    let stats = load_statistics(
        source.as_ref(),
        &finance.symbol,
        finance.start_date,
        finance.end_date,
    )?;

    info!(
        symbol = %finance.symbol,
        source = source.name(),
        observations = stats.observations,
        last_price = stats.last_price,
        drift = stats.drift(),
        volatility = stats.volatility(),
        "Loaded return statistics"
    );

    Ok(FinanceKernel::from_statistics(&stats, finance.window_size)?)
}

/// Run the finance command
pub fn run(config: &SimulationConfig) -> Result<()> {
    let run = config.finance_run_config()?;
    let kernel = kernel(config)?;
    let symbol = config.finance.symbol.as_str();

    let estimate = MonteCarloRunner::run(&kernel, &run)?;
    let summary = EstimateSummary::paths(symbol, &estimate);

    let sinks = report_sinks(config)?;
    publish(&sinks, &Report::Estimate(&summary))?;
    if run.output().is_trace() {
        publish(
            &sinks,
            &Report::PathTrace {
                symbol,
                paths: &estimate.value.paths,
            },
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{read_summary, small_config};
    use crate::CliError;
    use sampler_core::SamplingError;

    #[test]
    fn test_synthetic_history_paths_trace() {
        let (mut config, _dir) = small_config();
        config.run.trace = true;
        run(&config).unwrap();

        let summary = read_summary(&config.output.dir.join("AAPL_estimate.json"));
        assert_eq!(summary.samples_drawn, 40);
        assert!(summary.lower_quantile.unwrap() <= summary.upper_quantile.unwrap());

        let trace = std::fs::read_to_string(config.output.dir.join("AAPL_paths.txt")).unwrap();
        let lines: Vec<&str> = trace.lines().collect();
        assert_eq!(lines.len(), 40);
        assert!(lines[0].starts_with("1, "));
        assert!(lines[39].starts_with("40, "));
        // serial number plus window_size + 1 prices
        assert_eq!(lines[0].split(", ").count(), 12);
    }

    #[test]
    fn test_missing_csv_history_is_data_unavailable() {
        let (mut config, dir) = small_config();
        config.finance.source = PriceSourceKind::Csv;
        config.finance.data_dir = dir.path().join("no-such-dir");

        let err = run(&config).unwrap_err();
        match err {
            CliError::Sampling(SamplingError::DataUnavailable { symbol, .. }) => {
                assert_eq!(symbol, "AAPL");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
