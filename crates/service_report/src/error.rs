//! Error types for report sinks.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while emitting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A file or stream could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Destination being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV table could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink's shared state was poisoned by a panicking writer.
    #[error("Report sink state poisoned")]
    Poisoned,
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for report sinks.
pub type Result<T> = std::result::Result<T, ReportError>;
