//! CLI error types.

use thiserror::Error;

/// Errors surfaced by `mcsim` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] infra_config::ConfigError),

    /// A run or sweep failed.
    #[error("Sampling error: {0}")]
    Sampling(#[from] sampler_core::SamplingError),

    /// A report could not be emitted.
    #[error("Report error: {0}")]
    Report(#[from] service_report::ReportError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
