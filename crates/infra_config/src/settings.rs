//! Simulation configuration.
//!
//! Loaded from a TOML file (default [`DEFAULT_CONFIG_FILE`]) and overridden
//! by `MCSIM_*` environment variables. Every field has a default, so a
//! partial file (or none at all) is valid.
//!
//! ```toml
//! log_level = "info"
//!
//! [run]
//! total_samples = 1000000
//! worker_count = 4
//! mode = "parallel"
//! seed = 12345
//! trace = false
//!
//! [scaling]
//! law = "amdahl"
//! serial_fraction = 0.0
//! parallel_fraction = 1.0
//! min_workers = 2
//! max_workers = 13
//!
//! [integration]
//! integrand = "linear"
//! lower_bound = 1.0
//! upper_bound = 2.0
//! probe_step = 0.01
//!
//! [finance]
//! symbol = "AAPL"
//! start_date = "1980-01-01"
//! end_date = "2019-12-31"
//! window_size = 100
//! paths = 1000
//! source = "csv"
//! data_dir = "data/prices"
//!
//! [output]
//! dir = "output"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sampler_core::{ExecutionMode, OutputMode, RunConfig};
use sampler_scaling::{ScalingAnalyzer, ScalingLaw, ScalingLawParameters};

use crate::error::{ConfigError, Result};
use crate::integrand::NamedIntegrand;

/// File looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mcsim.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "MCSIM_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// `[run]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Total samples N.
    pub total_samples: usize,
    /// Worker count W.
    pub worker_count: usize,
    /// Serial or parallel dispatch.
    pub mode: ExecutionMode,
    /// Base seed for per-share streams.
    pub seed: u64,
    /// Cap on pool threads (logical core count when unset).
    pub thread_cap: Option<usize>,
    /// Record raw samples for export.
    pub trace: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            total_samples: 1_000_000,
            worker_count: 4,
            mode: ExecutionMode::Parallel,
            seed: sampler_core::config::DEFAULT_SEED,
            thread_cap: None,
            trace: false,
        }
    }
}

/// `[scaling]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingSection {
    /// Scaling law of the theoretical column.
    pub law: ScalingLaw,
    /// Serial fraction `s`.
    pub serial_fraction: f64,
    /// Parallel fraction `p`.
    pub parallel_fraction: f64,
    /// Smallest swept worker count.
    pub min_workers: usize,
    /// Largest swept worker count.
    pub max_workers: usize,
    /// Prepend the `worker_count = 1` baseline row.
    pub include_baseline: bool,
}

impl Default for ScalingSection {
    fn default() -> Self {
        Self {
            law: ScalingLaw::Amdahl,
            serial_fraction: 0.0,
            parallel_fraction: 1.0,
            min_workers: sampler_scaling::DEFAULT_MIN_WORKERS,
            max_workers: sampler_scaling::DEFAULT_MAX_WORKERS,
            include_baseline: false,
        }
    }
}

/// `[integration]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSection {
    /// Integrand to estimate.
    pub integrand: NamedIntegrand,
    /// Lower integration bound.
    pub lower_bound: f64,
    /// Upper integration bound.
    pub upper_bound: f64,
    /// Step between envelope probes.
    pub probe_step: f64,
}

impl Default for IntegrationSection {
    fn default() -> Self {
        Self {
            integrand: NamedIntegrand::Linear,
            lower_bound: 1.0,
            upper_bound: 2.0,
            probe_step: 0.01,
        }
    }
}

/// Where price history comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSourceKind {
    /// `<data_dir>/<SYMBOL>.csv` files.
    Csv,
    /// Seeded synthetic history.
    #[default]
    Synthetic,
}

impl FromStr for PriceSourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(format!(
                "unknown price source '{}', expected csv or synthetic",
                other
            )),
        }
    }
}

/// `[finance]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceSection {
    /// Instrument symbol.
    pub symbol: String,
    /// First date of the history window.
    pub start_date: NaiveDate,
    /// Last date of the history window.
    pub end_date: NaiveDate,
    /// Simulated steps per path.
    pub window_size: usize,
    /// Paths simulated per run (the finance sample count).
    pub paths: usize,
    /// History source.
    pub source: PriceSourceKind,
    /// Directory of CSV history files.
    pub data_dir: PathBuf,
}

impl Default for FinanceSection {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            start_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2019, 12, 31).unwrap_or_default(),
            window_size: 100,
            paths: 1_000,
            source: PriceSourceKind::default(),
            data_dir: PathBuf::from("data/prices"),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for CSV, JSON and trace files.
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Default tracing directive.
    pub log_level: String,
    /// Run settings.
    pub run: RunSection,
    /// Scaling sweep settings.
    pub scaling: ScalingSection,
    /// Integration use case.
    pub integration: IntegrationSection,
    /// Finance use case.
    pub finance: FinanceSection,
    /// Report output.
    pub output: OutputSection,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            run: RunSection::default(),
            scaling: ScalingSection::default(),
            integration: IntegrationSection::default(),
            finance: FinanceSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl SimulationConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Applies `MCSIM_*` environment variable overrides.
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by `MCSIM_*` variable names.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(level) = get("LOG_LEVEL") {
            self.log_level = level;
        }

        override_parsed(&get, "TOTAL_SAMPLES", &mut self.run.total_samples);
        override_parsed(&get, "WORKER_COUNT", &mut self.run.worker_count);
        override_parsed(&get, "SEED", &mut self.run.seed);
        override_parsed(&get, "TRACE", &mut self.run.trace);
        if let Some(mode) = parsed::<ExecutionMode>(&get, "MODE") {
            self.run.mode = mode;
        }
        if let Some(cap) = parsed::<usize>(&get, "THREAD_CAP") {
            self.run.thread_cap = (cap > 0).then_some(cap);
        }

        if let Some(law) = parsed::<ScalingLaw>(&get, "SCALING_LAW") {
            self.scaling.law = law;
        }
        override_parsed(&get, "SERIAL_FRACTION", &mut self.scaling.serial_fraction);
        override_parsed(&get, "PARALLEL_FRACTION", &mut self.scaling.parallel_fraction);
        override_parsed(&get, "MIN_WORKERS", &mut self.scaling.min_workers);
        override_parsed(&get, "MAX_WORKERS", &mut self.scaling.max_workers);

        if let Some(integrand) = parsed::<NamedIntegrand>(&get, "INTEGRAND") {
            self.integration.integrand = integrand;
        }

        if let Some(symbol) = get("SYMBOL") {
            self.finance.symbol = symbol;
        }
        override_parsed(&get, "FINANCE_PATHS", &mut self.finance.paths);
        if let Some(source) = parsed::<PriceSourceKind>(&get, "PRICE_SOURCE") {
            self.finance.source = source;
        }
        if let Some(dir) = get("DATA_DIR") {
            self.finance.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }

        self
    }

    /// Validates every setting, collecting all problems.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        let run = &self.run;
        if run.total_samples == 0 {
            errors.push("run.total_samples must be greater than 0".to_string());
        }
        if run.worker_count == 0 {
            errors.push("run.worker_count must be greater than 0".to_string());
        }
        if run.worker_count > run.total_samples {
            errors.push(format!(
                "run.worker_count {} exceeds run.total_samples {}",
                run.worker_count, run.total_samples
            ));
        }
        if run.thread_cap == Some(0) {
            errors.push("run.thread_cap must be greater than 0 when set".to_string());
        }

        let scaling = &self.scaling;
        if let Err(e) = ScalingLawParameters::new(scaling.serial_fraction, scaling.parallel_fraction)
        {
            errors.push(format!("scaling: {}", e));
        }
        if scaling.min_workers == 0 {
            errors.push("scaling.min_workers must be at least 1".to_string());
        }
        if scaling.min_workers > scaling.max_workers {
            errors.push(format!(
                "scaling.min_workers {} exceeds scaling.max_workers {}",
                scaling.min_workers, scaling.max_workers
            ));
        }
        if scaling.include_baseline && scaling.min_workers == 1 {
            errors.push(
                "scaling.min_workers must be at least 2 when include_baseline is set".to_string(),
            );
        }

        let integration = &self.integration;
        if !integration.lower_bound.is_finite() || !integration.upper_bound.is_finite() {
            errors.push("integration bounds must be finite".to_string());
        } else if integration.lower_bound >= integration.upper_bound {
            errors.push(format!(
                "integration.lower_bound {} must be below integration.upper_bound {}",
                integration.lower_bound, integration.upper_bound
            ));
        }
        if !(integration.probe_step.is_finite() && integration.probe_step > 0.0) {
            errors.push(format!(
                "integration.probe_step {} must be positive",
                integration.probe_step
            ));
        }

        let finance = &self.finance;
        if finance.symbol.trim().is_empty() {
            errors.push("finance.symbol cannot be empty".to_string());
        }
        if finance.start_date > finance.end_date {
            errors.push(format!(
                "finance.start_date {} is after finance.end_date {}",
                finance.start_date, finance.end_date
            ));
        }
        if finance.window_size == 0 {
            errors.push("finance.window_size must be greater than 0".to_string());
        }
        if finance.paths == 0 {
            errors.push("finance.paths must be greater than 0".to_string());
        }
        if finance.source == PriceSourceKind::Csv && finance.data_dir.as_os_str().is_empty() {
            errors.push("finance.data_dir cannot be empty for the csv source".to_string());
        }

        if self.output.dir.as_os_str().is_empty() {
            errors.push("output.dir cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Builds the engine's run configuration.
    ///
    /// Without `run.thread_cap` the pool is capped at the logical core count.
    pub fn run_config(&self) -> Result<RunConfig> {
        let output = if self.run.trace {
            OutputMode::Trace
        } else {
            OutputMode::Measure
        };
        Ok(RunConfig::builder()
            .total_samples(self.run.total_samples)
            .worker_count(self.run.worker_count)
            .mode(self.run.mode)
            .output(output)
            .seed(self.run.seed)
            .thread_cap(self.run.thread_cap.unwrap_or_else(num_cpus::get))
            .build()?)
    }

    /// Builds the run configuration of the finance use case.
    ///
    /// Identical to [`Self::run_config`] except that the sample count is
    /// `finance.paths`.
    pub fn finance_run_config(&self) -> Result<RunConfig> {
        Ok(self
            .run_config()?
            .with_budget(self.finance.paths, self.run.worker_count)?)
    }

    /// Builds the scaling-law parameters.
    pub fn law_parameters(&self) -> Result<ScalingLawParameters> {
        Ok(ScalingLawParameters::new(
            self.scaling.serial_fraction,
            self.scaling.parallel_fraction,
        )?)
    }

    /// Builds a scaling analyzer for `law`.
    pub fn scaling_analyzer(&self, law: ScalingLaw) -> Result<ScalingAnalyzer> {
        Ok(ScalingAnalyzer::new(law, self.law_parameters()?)
            .with_range(self.scaling.min_workers, self.scaling.max_workers)?
            .with_baseline(self.scaling.include_baseline)?)
    }
}

fn parsed<T>(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = %format!("{}{}", ENV_PREFIX, name), value = %raw, error = %e, "ignoring invalid override");
            None
        }
    }
}

fn override_parsed<T>(get: &impl Fn(&str) -> Option<String>, name: &str, target: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = parsed(get, name) {
        *target = value;
    }
}
