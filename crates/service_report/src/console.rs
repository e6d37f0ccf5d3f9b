//! Human-readable report output.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::error::{ReportError, Result};
use crate::report::{EstimateSummary, Report};
use crate::ReportSink;

/// Number of trace entries echoed to the console.
const TRACE_PREVIEW: usize = 3;

/// Writes reports as plain text to a shared writer.
///
/// # Examples
///
/// ```rust
/// use service_report::{ConsoleSink, ReportSink};
///
/// let sink = ConsoleSink::new(Vec::new());
/// let paths: Vec<Vec<f64>> = vec![vec![100.0, 101.0]];
/// sink.send(&service_report::Report::PathTrace { symbol: "AAPL", paths: &paths }).unwrap();
/// let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
/// assert_eq!(text, "AAPL: 1 simulated paths of 1 steps\n");
/// ```
#[derive(Debug)]
pub struct ConsoleSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    /// Creates a sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner().map_err(|_| ReportError::Poisoned)
    }

    fn render(&self, report: &Report<'_>) -> String {
        match report {
            Report::Estimate(summary) => render_estimate(summary),
            Report::Scaling { use_case, report } => {
                let mut text = format!(
                    "{} scaling ({}, s = {}, p = {}, N0 = {}, serial {:.7} s)\n",
                    use_case,
                    report.law,
                    report.parameters.serial_fraction(),
                    report.parameters.parallel_fraction(),
                    report.base_samples,
                    report.serial_time
                );
                text.push_str(&format!(
                    "{:>8} {:>12} {:>12} {:>10}\n",
                    "workers", "achieved", "theoretical", "efficiency"
                ));
                for record in &report.records {
                    text.push_str(&format!(
                        "{:>8} {:>12.4} {:>12.4} {:>10.3}\n",
                        record.worker_count,
                        record.achieved_speedup,
                        record.theoretical_speedup,
                        record.efficiency()
                    ));
                }
                if let Some(best) = report.best() {
                    text.push_str(&format!(
                        "best: {} workers at {:.4}x\n",
                        best.worker_count, best.achieved_speedup
                    ));
                }
                text
            }
            Report::PointTrace { use_case, points } => {
                let mut text = format!("{}: {} sampled points\n", use_case, points.len());
                for point in points.iter().take(TRACE_PREVIEW) {
                    text.push_str(&format!("  {:.7} {:.7}\n", point.x, point.y));
                }
                text
            }
            Report::PathTrace { symbol, paths } => {
                let steps = paths.first().map_or(0, |p| p.len().saturating_sub(1));
                format!("{}: {} simulated paths of {} steps\n", symbol, paths.len(), steps)
            }
        }
    }
}

fn render_estimate(summary: &EstimateSummary) -> String {
    let mut text = format!(
        "{}: {:.7} ({} samples, {} workers, {}, {:.7} s)\n",
        summary.use_case,
        summary.value,
        summary.samples_drawn,
        summary.worker_count,
        summary.mode,
        summary.elapsed_seconds
    );
    if let (Some(reference), Some(error)) = (summary.reference, summary.absolute_error()) {
        text.push_str(&format!("  reference {:.7}, absolute error {:.7}\n", reference, error));
    }
    if let (Some(lower), Some(upper)) = (summary.lower_quantile, summary.upper_quantile) {
        text.push_str(&format!("  terminal 5%-95% range [{:.4}, {:.4}]\n", lower, upper));
    }
    text
}

impl<W: Write + Send> ReportSink for ConsoleSink<W> {
    fn send(&self, report: &Report<'_>) -> Result<()> {
        let text = self.render(report);
        let mut out = self.out.lock().map_err(|_| ReportError::Poisoned)?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| ReportError::io("<console>", e))
    }
}
