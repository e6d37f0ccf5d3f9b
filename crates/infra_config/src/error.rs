//! Configuration error types.

use std::path::PathBuf;

use sampler_core::SamplingError;
use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("Parse error in {}: {message}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// One or more settings are invalid.
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Settings were rejected by the sampling engine.
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

impl ConfigError {
    /// Returns the validation messages, if this is a validation error.
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Validation(messages) => messages,
            _ => &[],
        }
    }
}

/// Result alias for configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
