//! Report contents handed to sinks.

use serde::{Deserialize, Serialize};

use sampler_core::kernel::SamplePoint;
use sampler_core::{Estimate, ExecutionMode, PathBundle, ScalarEstimate};
use sampler_scaling::ScalingReport;

/// Quantiles reported for simulated terminal prices.
pub const TERMINAL_QUANTILES: [f64; 2] = [0.05, 0.95];

/// Flat, serialisable summary of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSummary {
    /// Use case name (`pi`, `integration`, a symbol for finance).
    pub use_case: String,
    /// Point estimate (mean terminal price for finance).
    pub value: f64,
    /// Known exact value, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
    /// 5% quantile of terminal prices (finance only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_quantile: Option<f64>,
    /// 95% quantile of terminal prices (finance only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_quantile: Option<f64>,
    /// Samples (or paths) actually drawn.
    pub samples_drawn: usize,
    /// Number of shares.
    pub worker_count: usize,
    /// Execution mode.
    pub mode: ExecutionMode,
    /// Wall-clock seconds.
    pub elapsed_seconds: f64,
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
}

impl EstimateSummary {
    /// Summarises a scalar run.
    pub fn scalar(
        use_case: impl Into<String>,
        estimate: &Estimate<ScalarEstimate>,
        reference: Option<f64>,
    ) -> Self {
        Self {
            use_case: use_case.into(),
            value: estimate.value.value,
            reference,
            lower_quantile: None,
            upper_quantile: None,
            samples_drawn: estimate.samples_drawn,
            worker_count: estimate.worker_count,
            mode: estimate.mode,
            elapsed_seconds: estimate.elapsed_seconds,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Summarises a path simulation by its terminal prices.
    pub fn paths(symbol: impl Into<String>, estimate: &Estimate<PathBundle>) -> Self {
        let bundle = &estimate.value;
        Self {
            use_case: symbol.into(),
            value: bundle.mean_terminal_price().unwrap_or(f64::NAN),
            reference: None,
            lower_quantile: bundle.terminal_quantile(TERMINAL_QUANTILES[0]),
            upper_quantile: bundle.terminal_quantile(TERMINAL_QUANTILES[1]),
            samples_drawn: estimate.samples_drawn,
            worker_count: estimate.worker_count,
            mode: estimate.mode,
            elapsed_seconds: estimate.elapsed_seconds,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Returns `|value - reference|`, when a reference is known.
    pub fn absolute_error(&self) -> Option<f64> {
        self.reference.map(|r| (self.value - r).abs())
    }
}

/// A report, borrowing its contents from the caller.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// Result of one estimation run.
    Estimate(&'a EstimateSummary),
    /// Result of a scaling sweep.
    Scaling {
        /// Use case that was swept.
        use_case: &'a str,
        /// Sweep result.
        report: &'a ScalingReport,
    },
    /// Raw sample coordinates of a scalar run, in draw order.
    PointTrace {
        /// Use case that produced the points.
        use_case: &'a str,
        /// Sampled points.
        points: &'a [SamplePoint],
    },
    /// Simulated price paths.
    PathTrace {
        /// Instrument symbol.
        symbol: &'a str,
        /// Paths in generation order.
        paths: &'a [Vec<f64>],
    },
}

impl Report<'_> {
    /// Short kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Estimate(_) => "estimate",
            Self::Scaling { .. } => "scaling",
            Self::PointTrace { .. } => "point_trace",
            Self::PathTrace { .. } => "path_trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<T>(value: T) -> Estimate<T> {
        Estimate {
            value,
            samples_drawn: 4,
            worker_count: 2,
            mode: ExecutionMode::Parallel,
            elapsed_seconds: 0.5,
        }
    }

    #[test]
    fn test_scalar_summary() {
        let estimate = run(ScalarEstimate {
            value: 3.0,
            hits: 3,
            samples: 4,
            trace: vec![],
        });
        let summary = EstimateSummary::scalar("pi", &estimate, Some(std::f64::consts::PI));
        assert_eq!(summary.value, 3.0);
        assert!((summary.absolute_error().unwrap() - 0.14159).abs() < 1e-4);
        assert_eq!(summary.lower_quantile, None);
    }

    #[test]
    fn test_path_summary_uses_terminal_prices() {
        let estimate = run(PathBundle {
            paths: vec![vec![1.0, 2.0], vec![1.0, 4.0]],
        });
        let summary = EstimateSummary::paths("AAPL", &estimate);
        assert_eq!(summary.value, 3.0);
        assert_eq!(summary.lower_quantile, Some(2.0));
        assert_eq!(summary.upper_quantile, Some(4.0));
        assert_eq!(summary.absolute_error(), None);
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let estimate = run(ScalarEstimate {
            value: 3.0,
            hits: 3,
            samples: 4,
            trace: vec![],
        });
        let json = serde_json::to_string(&EstimateSummary::scalar("pi", &estimate, None)).unwrap();
        assert!(!json.contains("reference"));
        assert!(json.contains("\"mode\":\"parallel\""));
    }
}
