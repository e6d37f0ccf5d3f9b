//! # Service Report (Service Layer: Output)
//!
//! Report sinks for estimation runs, scaling sweeps and simulation traces.
//!
//! A [`Report`] borrows its contents from the caller; sinks render or
//! persist it. Two sinks are provided:
//!
//! - [`ConsoleSink`]: human-readable text on any writer
//! - [`FileWriter`]: JSON summaries, CSV scaling tables and trace files

#![warn(missing_docs)]

pub mod console;
pub mod error;
pub mod file_writer;
pub mod report;

pub use console::ConsoleSink;
pub use error::{ReportError, Result};
pub use file_writer::{FileWriter, WrittenFile, TRACE_DIGITS};
pub use report::{EstimateSummary, Report, TERMINAL_QUANTILES};

/// Destination for reports.
pub trait ReportSink: Send + Sync {
    /// Emits one report.
    fn send(&self, report: &Report<'_>) -> Result<()>;
}
