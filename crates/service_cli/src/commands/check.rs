//! Check command implementation
//!
//! Prints the resolved configuration, validates it and reports the
//! available cores.

use std::path::Path;

use tracing::info;

use infra_config::{SimulationConfig, DEFAULT_CONFIG_FILE};

use crate::Result;

/// Run the check command
pub fn run(config: &SimulationConfig, config_path: Option<&Path>) -> Result<()> {
    info!("Checking configuration...");

    let source = match config_path {
        Some(path) => path.display().to_string(),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => DEFAULT_CONFIG_FILE.to_string(),
        None => "built-in defaults".to_string(),
    };

    for line in summary_lines(config, &source) {
        println!("{}", line);
    }

    match config.validate() {
        Ok(()) => {
            println!("configuration: OK");
            Ok(())
        }
        Err(err) => {
            for message in err.messages() {
                println!("  ✗ {}", message);
            }
            Err(err.into())
        }
    }
}

fn summary_lines(config: &SimulationConfig, source: &str) -> Vec<String> {
    let run = &config.run;
    let scaling = &config.scaling;
    let finance = &config.finance;
    vec![
        format!("config source:   {}", source),
        format!("logical cores:   {}", num_cpus::get()),
        format!("physical cores:  {}", num_cpus::get_physical()),
        format!(
            "run:             {} samples, {} workers, {}, seed {}, thread cap {}",
            run.total_samples,
            run.worker_count,
            run.mode,
            run.seed,
            run.thread_cap.map_or_else(
                || format!("{} (core count)", num_cpus::get()),
                |cap| cap.to_string()
            )
        ),
        format!(
            "scaling:         {} (s = {}, p = {}), workers {}..={}{}",
            scaling.law,
            scaling.serial_fraction,
            scaling.parallel_fraction,
            scaling.min_workers,
            scaling.max_workers,
            if scaling.include_baseline { " plus baseline" } else { "" }
        ),
        format!(
            "integration:     {} over [{}, {}], probe step {}",
            config.integration.integrand.formula(),
            config.integration.lower_bound,
            config.integration.upper_bound,
            config.integration.probe_step
        ),
        format!(
            "finance:         {} {}..{}, {} paths of {} steps ({:?})",
            finance.symbol,
            finance.start_date,
            finance.end_date,
            finance.paths,
            finance.window_size,
            finance.source
        ),
        format!("output:          {}", config.output.dir.display()),
    ]
}
