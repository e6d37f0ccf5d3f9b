//! File writer for report output.
//!
//! | Report | File | Format |
//! |--------|------|--------|
//! | `Estimate` | `<use_case>_estimate.json` | pretty JSON summary |
//! | `Scaling` | `<use_case>_<law>_scaling.csv` | `worker_count,achieved_speedup,theoretical_speedup` |
//! | `PointTrace` | `<use_case>_points.txt` | `x y` per sample |
//! | `PathTrace` | `<symbol>_paths.txt` | `serial_number, p0, p1, …` per path |
//!
//! Trace values are written with seven decimal places. Existing files are
//! overwritten.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::info;

use sampler_core::kernel::SamplePoint;
use sampler_scaling::ScalingReport;

use crate::error::{ReportError, Result};
use crate::report::{EstimateSummary, Report};
use crate::ReportSink;

/// Decimal places used in trace files.
pub const TRACE_DIGITS: usize = 7;

/// Writes reports as files under one output directory.
#[derive(Debug, Clone)]
pub struct FileWriter {
    output_dir: PathBuf,
    written_files: Arc<RwLock<Vec<WrittenFile>>>,
}

/// Record of a written file.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    /// File path.
    pub path: PathBuf,
    /// Report kind (see [`Report::kind`]).
    pub kind: &'static str,
    /// Size in bytes.
    pub size: u64,
    /// RFC 3339 timestamp.
    pub written_at: String,
}

impl FileWriter {
    /// Creates a writer, creating `output_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the directory cannot be created.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|e| ReportError::io(&output_dir, e))?;

        Ok(Self {
            output_dir,
            written_files: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns every file written so far, in write order.
    pub fn written_files(&self) -> Vec<WrittenFile> {
        self.written_files
            .read()
            .map(|files| files.clone())
            .unwrap_or_default()
    }

    /// Writes one report and returns the file path.
    pub fn write(&self, report: &Report<'_>) -> Result<PathBuf> {
        let path = match report {
            Report::Estimate(summary) => self.write_estimate(summary)?,
            Report::Scaling { use_case, report } => self.write_scaling(use_case, report)?,
            Report::PointTrace { use_case, points } => self.write_points(use_case, points)?,
            Report::PathTrace { symbol, paths } => self.write_paths(symbol, paths)?,
        };

        let size = fs::metadata(&path)
            .map_err(|e| ReportError::io(&path, e))?
            .len();

        self.written_files
            .write()
            .map_err(|_| ReportError::Poisoned)?
            .push(WrittenFile {
                path: path.clone(),
                kind: report.kind(),
                size,
                written_at: chrono::Utc::now().to_rfc3339(),
            });

        info!(
            path = %path.display(),
            kind = report.kind(),
            size,
            "Report written to file"
        );

        Ok(path)
    }

    fn write_estimate(&self, summary: &EstimateSummary) -> Result<PathBuf> {
        let path = self.file_path(&summary.use_case, "estimate.json");
        let mut out = self.create(&path)?;
        serde_json::to_writer_pretty(&mut out, summary)?;
        writeln!(out).map_err(|e| ReportError::io(&path, e))?;
        out.flush().map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }

    fn write_scaling(&self, use_case: &str, report: &ScalingReport) -> Result<PathBuf> {
        let path = self.file_path(use_case, &format!("{}_scaling.csv", report.law));
        let mut csv = csv::Writer::from_path(&path)?;
        for record in &report.records {
            csv.serialize(record)?;
        }
        csv.flush().map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }

    fn write_points(&self, use_case: &str, points: &[SamplePoint]) -> Result<PathBuf> {
        let path = self.file_path(use_case, "points.txt");
        let mut out = self.create(&path)?;
        for point in points {
            writeln!(
                out,
                "{:.digits$} {:.digits$}",
                point.x,
                point.y,
                digits = TRACE_DIGITS
            )
            .map_err(|e| ReportError::io(&path, e))?;
        }
        out.flush().map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }

    fn write_paths(&self, symbol: &str, paths: &[Vec<f64>]) -> Result<PathBuf> {
        let path = self.file_path(symbol, "paths.txt");
        let mut out = self.create(&path)?;
        for (index, prices) in paths.iter().enumerate() {
            writeln!(out, "{}", path_line(index + 1, prices)).map_err(|e| ReportError::io(&path, e))?;
        }
        out.flush().map_err(|e| ReportError::io(&path, e))?;
        Ok(path)
    }

    fn file_path(&self, stem: &str, suffix: &str) -> PathBuf {
        let stem: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.output_dir.join(format!("{}_{}", stem, suffix))
    }

    fn create(&self, path: &Path) -> Result<BufWriter<fs::File>> {
        fs::File::create(path)
            .map(BufWriter::new)
            .map_err(|e| ReportError::io(path, e))
    }
}

/// Formats one path as `serial_number, p0, p1, …`.
fn path_line(serial_number: usize, prices: &[f64]) -> String {
    let mut line = serial_number.to_string();
    for price in prices {
        line.push_str(&format!(", {:.digits$}", price, digits = TRACE_DIGITS));
    }
    line
}

impl ReportSink for FileWriter {
    fn send(&self, report: &Report<'_>) -> Result<()> {
        self.write(report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_line_format() {
        assert_eq!(path_line(1, &[100.0, 101.25]), "1, 100.0000000, 101.2500000");
        assert_eq!(path_line(12, &[]), "12");
    }

    #[test]
    fn test_file_names_are_sanitised() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path()).unwrap();
        let path = writer.file_path("BRK.B", "paths.txt");
        assert_eq!(path.file_name().unwrap(), "BRK_B_paths.txt");
    }

    #[test]
    fn test_new_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = FileWriter::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(writer.output_dir(), nested.as_path());
        assert!(writer.written_files().is_empty());
    }
}
