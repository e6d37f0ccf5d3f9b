//! The price source interface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sampler_core::ReturnStatistics;

use crate::error::{PriceSourceError, Result};

/// One daily close.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price.
    pub close: f64,
}

/// A provider of historical daily closes.
pub trait PriceSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns closes for `symbol` in `[start, end]`, oldest first.
    ///
    /// The result is never empty.
    fn fetch_close_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>>;
}

/// Fetches closes and reduces them to daily return statistics.
///
/// # Errors
///
/// Returns [`sampler_core::SamplingError::DataUnavailable`] if the source
/// fails or yields fewer than two closes.
pub fn load_statistics<S>(
    source: &S,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> sampler_core::Result<ReturnStatistics>
where
    S: PriceSource + ?Sized,
{
    let points = source.fetch_close_prices(symbol, start, end)?;
    ReturnStatistics::from_closes(symbol, &closes(&points))
}

/// Extracts the close column.
pub fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}

pub(crate) fn check_range(symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(PriceSourceError::InvalidRange {
            symbol: symbol.to_string(),
            start,
            end,
        });
    }
    Ok(())
}
