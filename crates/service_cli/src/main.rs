//! mcsim - Parallel Monte Carlo estimation from the command line
//!
//! # Commands
//!
//! - `mcsim pi` - Estimate π from points in the unit quarter circle
//! - `mcsim integrate` - Estimate a definite integral by rejection sampling
//! - `mcsim finance` - Simulate price paths from historical returns
//! - `mcsim scale --use-case <pi|integration|finance> --law <amdahl|gustafson>`
//!   - Sweep worker counts against a scaling law
//! - `mcsim check` - Show the resolved configuration and available cores
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate resolves configuration
//! (file, then `MCSIM_*` variables, then flags), runs the kernel layer and
//! hands the results to the report sinks.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_config::{NamedIntegrand, PriceSourceKind, SimulationConfig};
use sampler_core::ExecutionMode;
use sampler_scaling::ScalingLaw;

mod commands;
mod error;

pub use error::{CliError, Result};

use commands::UseCase;

/// Parallel Monte Carlo estimation and scaling analysis
#[derive(Parser)]
#[command(name = "mcsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to mcsim.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Per-run overrides shared by every estimation command.
#[derive(Args, Debug, Default, Clone)]
struct RunArgs {
    /// Total number of samples
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Number of workers (shares)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Execution mode (serial, parallel)
    #[arg(short, long)]
    mode: Option<ExecutionMode>,

    /// Base random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write raw samples or paths to trace files
    #[arg(short, long)]
    trace: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(samples) = self.samples {
            config.run.total_samples = samples;
        }
        if let Some(workers) = self.workers {
            config.run.worker_count = workers;
        }
        if let Some(mode) = self.mode {
            config.run.mode = mode;
        }
        if let Some(seed) = self.seed {
            config.run.seed = seed;
        }
        if self.trace {
            config.run.trace = true;
        }
    }
}

/// Finance-specific overrides.
#[derive(Args, Debug, Default, Clone)]
struct FinanceArgs {
    /// Instrument symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Number of simulated paths
    #[arg(long)]
    paths: Option<usize>,

    /// Steps per path
    #[arg(long)]
    window: Option<usize>,

    /// Price history source (csv, synthetic)
    #[arg(long)]
    source: Option<PriceSourceKind>,
}

impl FinanceArgs {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(symbol) = &self.symbol {
            config.finance.symbol = symbol.clone();
        }
        if let Some(paths) = self.paths {
            config.finance.paths = paths;
        }
        if let Some(window) = self.window {
            config.finance.window_size = window;
        }
        if let Some(source) = self.source {
            config.finance.source = source;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate π
    Pi {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Estimate a definite integral
    Integrate {
        #[command(flatten)]
        run: RunArgs,

        /// Integrand name or formula (e.g. linear, "x^2", sine)
        #[arg(short, long)]
        integrand: Option<NamedIntegrand>,

        /// Lower integration bound
        #[arg(long, allow_negative_numbers = true)]
        lower: Option<f64>,

        /// Upper integration bound
        #[arg(long, allow_negative_numbers = true)]
        upper: Option<f64>,
    },

    /// Simulate price paths from historical returns
    Finance {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        finance: FinanceArgs,
    },

    /// Sweep worker counts and compare against a scaling law
    Scale {
        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        finance: FinanceArgs,

        /// Use case to sweep
        #[arg(short, long, value_enum)]
        use_case: UseCase,

        /// Scaling law (amdahl/strong, gustafson/weak)
        #[arg(short, long)]
        law: Option<ScalingLaw>,

        /// Smallest worker count
        #[arg(long)]
        min_workers: Option<usize>,

        /// Largest worker count
        #[arg(long)]
        max_workers: Option<usize>,

        /// Prepend the single-worker baseline row
        #[arg(long)]
        baseline: bool,
    },

    /// Check configuration and available cores
    Check,
}

impl Commands {
    fn apply(&self, config: &mut SimulationConfig) {
        match self {
            Commands::Pi { run } => run.apply(config),
            Commands::Integrate {
                run,
                integrand,
                lower,
                upper,
            } => {
                run.apply(config);
                if let Some(integrand) = integrand {
                    config.integration.integrand = *integrand;
                }
                if let Some(lower) = lower {
                    config.integration.lower_bound = *lower;
                }
                if let Some(upper) = upper {
                    config.integration.upper_bound = *upper;
                }
            }
            Commands::Finance { run, finance } => {
                run.apply(config);
                finance.apply(config);
            }
            Commands::Scale {
                run,
                finance,
                law,
                min_workers,
                max_workers,
                baseline,
                ..
            } => {
                run.apply(config);
                finance.apply(config);
                if let Some(law) = law {
                    config.scaling.law = *law;
                }
                if let Some(min) = min_workers {
                    config.scaling.min_workers = *min;
                }
                if let Some(max) = max_workers {
                    config.scaling.max_workers = *max;
                }
                if *baseline {
                    config.scaling.include_baseline = true;
                }
            }
            Commands::Check => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        SimulationConfig::load_or_default(cli.config.as_deref())?.with_env_override();
    cli.command.apply(&mut config);

    // Initialise tracing
    let directive = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .init();

    if cli.verbose {
        debug!("Verbose mode enabled");
    }

    if !matches!(cli.command, Commands::Check) {
        config.validate()?;
    }

    match cli.command {
        Commands::Pi { .. } => commands::pi::run(&config),
        Commands::Integrate { .. } => commands::integrate::run(&config),
        Commands::Finance { .. } => commands::finance::run(&config),
        Commands::Scale { use_case, .. } => commands::scale::run(&config, use_case),
        Commands::Check => commands::check::run(&config, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mcsim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_overrides_replace_config_values() {
        let cli = parse(&[
            "pi", "--samples", "5000", "--workers", "5", "--mode", "serial", "--seed", "9",
            "--trace",
        ]);
        let mut config = SimulationConfig::default();
        cli.command.apply(&mut config);
        assert_eq!(config.run.total_samples, 5000);
        assert_eq!(config.run.worker_count, 5);
        assert_eq!(config.run.mode, ExecutionMode::Serial);
        assert_eq!(config.run.seed, 9);
        assert!(config.run.trace);
    }

    #[test]
    fn test_many_workers_for_pi_pass_validation() {
        let cli = parse(&["pi", "-n", "1000000", "-w", "2000"]);
        let mut config = SimulationConfig::default();
        cli.command.apply(&mut config);
        assert!(config.validate().is_ok());
        assert_eq!(config.run_config().unwrap().worker_count(), 2000);
    }

    #[test]
    fn test_missing_overrides_keep_config_values() {
        let cli = parse(&["integrate", "--integrand", "x^2", "--lower", "-1"]);
        let mut config = SimulationConfig::default();
        cli.command.apply(&mut config);
        assert_eq!(config.run.total_samples, 1_000_000);
        assert_eq!(config.integration.integrand, NamedIntegrand::Square);
        assert_eq!(config.integration.lower_bound, -1.0);
        assert_eq!(config.integration.upper_bound, 2.0);
    }

    #[test]
    fn test_scale_arguments() {
        let cli = parse(&[
            "--verbose", "scale", "--use-case", "finance", "--law", "weak", "--max-workers", "4",
            "--paths", "64", "--baseline",
        ]);
        assert!(cli.verbose);
        let mut config = SimulationConfig::default();
        cli.command.apply(&mut config);
        assert_eq!(config.scaling.law, ScalingLaw::Gustafson);
        assert_eq!(config.scaling.max_workers, 4);
        assert!(config.scaling.include_baseline);
        assert_eq!(config.finance.paths, 64);
        assert!(matches!(
            cli.command,
            Commands::Scale {
                use_case: UseCase::Finance,
                ..
            }
        ));
    }

    #[test]
    fn test_scale_requires_use_case() {
        assert!(Cli::try_parse_from(["mcsim", "scale"]).is_err());
        assert!(Cli::try_parse_from(["mcsim", "scale", "--use-case", "dice"]).is_err());
    }
}
