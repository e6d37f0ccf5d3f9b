//! Price history from local CSV exports.
//!
//! Each symbol lives in `<data_dir>/<SYMBOL>.csv` with at least a `Date`
//! column (`YYYY-MM-DD`) and a `Close` column (or their lowercase forms), as
//! in a Yahoo Finance download. Other columns are ignored.
//!
//! Rows with an unparsable date or a missing, non-numeric or non-positive
//! close are dropped before the range filter is applied.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{PriceSourceError, Result};
use crate::source::{check_range, PricePoint, PriceSource};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Close", alias = "close", default)]
    close: Option<String>,
}

impl HistoryRow {
    fn parse(&self) -> Option<PricePoint> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()?;
        let close: f64 = self.close.as_deref()?.trim().parse().ok()?;
        (close.is_finite() && close > 0.0).then_some(PricePoint { date, close })
    }
}

/// Reads `<data_dir>/<SYMBOL>.csv` files.
#[derive(Clone, Debug)]
pub struct CsvPriceSource {
    data_dir: PathBuf,
}

impl CsvPriceSource {
    /// Creates a source rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the history file path for `symbol`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    fn read_history(&self, symbol: &str) -> Result<Vec<PricePoint>> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(PriceSourceError::SymbolNotFound {
                symbol: symbol.to_string(),
                path,
            });
        }
        let file = File::open(&path).map_err(|source| PriceSourceError::Io {
            symbol: symbol.to_string(),
            path: path.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);
        let csv_err = |source| PriceSourceError::Csv {
            symbol: symbol.to_string(),
            source,
        };

        let headers = reader.headers().map_err(csv_err)?.clone();
        for column in ["Date", "Close"] {
            let lower = column.to_ascii_lowercase();
            if !headers.iter().any(|h| h == column || h == lower) {
                return Err(PriceSourceError::MissingColumn {
                    symbol: symbol.to_string(),
                    column,
                });
            }
        }

        let mut points = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<HistoryRow>() {
            match row.map_err(csv_err)?.parse() {
                Some(point) => points.push(point),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(symbol, dropped, kept = points.len(), "dropped unusable history rows");
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn fetch_close_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        check_range(symbol, start, end)?;

        let points: Vec<PricePoint> = self
            .read_history(symbol)?
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

        if points.is_empty() {
            return Err(PriceSourceError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        debug!(symbol, closes = points.len(), %start, %end, "loaded price history");
        Ok(points)
    }
}
