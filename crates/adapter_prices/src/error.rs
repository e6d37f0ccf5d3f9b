//! Error types for price sources.

use std::path::PathBuf;

use chrono::NaiveDate;
use sampler_core::SamplingError;
use thiserror::Error;

/// Errors raised while obtaining historical prices.
#[derive(Debug, Error)]
pub enum PriceSourceError {
    /// No history file exists for the symbol.
    #[error("No history for '{symbol}': {} does not exist", path.display())]
    SymbolNotFound {
        /// Requested symbol.
        symbol: String,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The history file could not be read.
    #[error("Failed to read history for '{symbol}' from {}: {source}", path.display())]
    Io {
        /// Requested symbol.
        symbol: String,
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The history file is not valid CSV.
    #[error("Malformed history for '{symbol}': {source}")]
    Csv {
        /// Requested symbol.
        symbol: String,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from the header.
    #[error("History for '{symbol}' has no '{column}' column")]
    MissingColumn {
        /// Requested symbol.
        symbol: String,
        /// Missing column name.
        column: &'static str,
    },

    /// `start` lies after `end`.
    #[error("Invalid date range for '{symbol}': {start} is after {end}")]
    InvalidRange {
        /// Requested symbol.
        symbol: String,
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// No usable closes remain in the range after cleaning.
    #[error("No usable closes for '{symbol}' between {start} and {end}")]
    EmptyRange {
        /// Requested symbol.
        symbol: String,
        /// Range start.
        start: NaiveDate,
        /// Range end.
        end: NaiveDate,
    },

    /// A source was configured with invalid parameters.
    #[error("Invalid price source parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl PriceSourceError {
    /// Returns the symbol the error relates to, if any.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::SymbolNotFound { symbol, .. }
            | Self::Io { symbol, .. }
            | Self::Csv { symbol, .. }
            | Self::MissingColumn { symbol, .. }
            | Self::InvalidRange { symbol, .. }
            | Self::EmptyRange { symbol, .. } => Some(symbol),
            Self::InvalidParameter { .. } => None,
        }
    }
}

impl From<PriceSourceError> for SamplingError {
    fn from(err: PriceSourceError) -> Self {
        let symbol = err.symbol().unwrap_or_default().to_string();
        SamplingError::DataUnavailable {
            symbol,
            reason: err.to_string(),
        }
    }
}

/// Result alias for price sources.
pub type Result<T> = std::result::Result<T, PriceSourceError>;
