//! Error types for the sampling engine.
//!
//! Every variant is terminal for the current run. Nothing is retried
//! automatically and no partial numeric result accompanies an error.

use thiserror::Error;

/// Errors raised while partitioning, sampling or aggregating.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SamplingError {
    /// Zero counts, or more workers than samples.
    ///
    /// Raised before any worker starts.
    #[error("Invalid budget: {total_samples} samples across {worker_count} workers ({reason})")]
    InvalidBudget {
        /// Requested total sample count.
        total_samples: usize,
        /// Requested worker count.
        worker_count: usize,
        /// Which constraint was violated.
        reason: &'static str,
    },

    /// A worker returned an error or terminated abnormally.
    ///
    /// The whole batch is aborted and aggregation is never invoked.
    #[error("Worker for share {share_index} failed: {message}")]
    WorkerFailure {
        /// Index of the share whose worker failed.
        share_index: usize,
        /// Failure description (error text or panic payload).
        message: String,
    },

    /// Historical data could not be obtained or was too sparse to use.
    #[error("Data unavailable for '{symbol}': {reason}")]
    DataUnavailable {
        /// Instrument symbol that was requested.
        symbol: String,
        /// Why the data could not be used.
        reason: String,
    },

    /// A computation degenerated (zero envelope, zero samples, zero time).
    #[error("Arithmetic degeneracy in {context}: {detail}")]
    ArithmeticDegeneracy {
        /// Computation that degenerated.
        context: &'static str,
        /// Values that triggered it.
        detail: String,
    },

    /// Malformed kernel or configuration parameter.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// The worker thread pool could not be built.
    #[error("Worker pool unavailable: {0}")]
    PoolUnavailable(String),
}

impl SamplingError {
    /// Creates an [`SamplingError::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }

    /// Creates an [`SamplingError::ArithmeticDegeneracy`].
    pub fn degenerate(context: &'static str, detail: impl Into<String>) -> Self {
        Self::ArithmeticDegeneracy {
            context,
            detail: detail.into(),
        }
    }

    /// Creates a [`SamplingError::DataUnavailable`].
    pub fn data_unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Returns the failing share index for worker failures.
    pub fn failed_share(&self) -> Option<usize> {
        match self {
            Self::WorkerFailure { share_index, .. } => Some(*share_index),
            _ => None,
        }
    }
}

/// Result alias for the sampling engine.
pub type Result<T> = std::result::Result<T, SamplingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_budget_display_names_parameters() {
        let err = SamplingError::InvalidBudget {
            total_samples: 3,
            worker_count: 8,
            reason: "worker_count exceeds total_samples",
        };
        let text = err.to_string();
        assert!(text.contains("3 samples"));
        assert!(text.contains("8 workers"));
        assert!(text.contains("exceeds"));
    }

    #[test]
    fn test_worker_failure_reports_share() {
        let err = SamplingError::WorkerFailure {
            share_index: 4,
            message: "boom".to_string(),
        };
        assert_eq!(err.failed_share(), Some(4));
        assert!(err.to_string().contains("share 4"));
        assert_eq!(SamplingError::PoolUnavailable("x".into()).failed_share(), None);
    }

    #[test]
    fn test_helper_constructors() {
        let err = SamplingError::degenerate("envelope", "f_max = 0");
        assert!(matches!(
            err,
            SamplingError::ArithmeticDegeneracy {
                context: "envelope",
                ..
            }
        ));

        let err = SamplingError::data_unavailable("AAPL", "empty range");
        assert!(err.to_string().contains("AAPL"));

        let err = SamplingError::invalid_parameter("window_size", "must be positive");
        assert!(err.to_string().contains("window_size"));
    }
}
