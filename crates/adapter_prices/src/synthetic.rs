//! Deterministic synthetic price history.
//!
//! Generates a Geometric Brownian Motion close series on weekdays:
//!
//! ```text
//! S(t+dt) = S(t) · exp((μ - σ²/2)·dt + σ·√dt·Z),   dt = 1/252
//! ```
//!
//! The series depends only on the symbol, the seed and the model
//! parameters, so repeated fetches of the same range return the same closes.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use tracing::debug;

use crate::error::{PriceSourceError, Result};
use crate::source::{check_range, PricePoint, PriceSource};

/// Trading days per year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Seeded GBM price history on weekdays.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticPriceSource {
    initial_price: f64,
    annual_drift: f64,
    annual_volatility: f64,
    seed: u64,
}

impl SyntheticPriceSource {
    /// Creates a source with explicit model parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PriceSourceError::InvalidParameter`] for a non-positive
    /// initial price, a non-finite drift or a negative volatility.
    pub fn new(
        initial_price: f64,
        annual_drift: f64,
        annual_volatility: f64,
        seed: u64,
    ) -> Result<Self> {
        if !(initial_price.is_finite() && initial_price > 0.0) {
            return Err(PriceSourceError::InvalidParameter {
                name: "initial_price",
                value: format!("{} must be positive", initial_price),
            });
        }
        if !annual_drift.is_finite() {
            return Err(PriceSourceError::InvalidParameter {
                name: "annual_drift",
                value: format!("{} must be finite", annual_drift),
            });
        }
        if !(annual_volatility.is_finite() && annual_volatility >= 0.0) {
            return Err(PriceSourceError::InvalidParameter {
                name: "annual_volatility",
                value: format!("{} must be non-negative", annual_volatility),
            });
        }
        Ok(Self {
            initial_price,
            annual_drift,
            annual_volatility,
            seed,
        })
    }

    /// Creates a source with the default model (100.0, 5% drift, 20% vol).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        // FNV-1a over the symbol, mixed with the base seed.
        symbol
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64 ^ self.seed, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            })
    }
}

impl Default for SyntheticPriceSource {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            annual_drift: 0.05,
            annual_volatility: 0.20,
            seed: 12345,
        }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn fetch_close_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        check_range(symbol, start, end)?;

        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        let drift_term = (self.annual_drift - 0.5 * self.annual_volatility.powi(2)) * dt;
        let diffusion = self.annual_volatility * dt.sqrt();
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));

        let mut price = self.initial_price;
        let mut points = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            if !points.is_empty() {
                let z: f64 = StandardNormal.sample(&mut rng);
                price *= (drift_term + diffusion * z).exp();
            }
            points.push(PricePoint { date, close: price });
        }

        if points.is_empty() {
            return Err(PriceSourceError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        debug!(symbol, closes = points.len(), seed = self.seed, "generated synthetic history");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekdays_only() {
        let source = SyntheticPriceSource::default();
        // 2024-01-01 is a Monday; two full weeks.
        let points = source
            .fetch_close_prices("DEMO", date(2024, 1, 1), date(2024, 1, 14))
            .unwrap();
        assert_eq!(points.len(), 10);
        assert!(points
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert_eq!(points[0].close, 100.0);
    }

    #[test]
    fn test_deterministic_per_symbol() {
        let source = SyntheticPriceSource::with_seed(7);
        let range = (date(2023, 3, 1), date(2023, 6, 30));
        let a = source.fetch_close_prices("AAA", range.0, range.1).unwrap();
        let b = source.fetch_close_prices("AAA", range.0, range.1).unwrap();
        let c = source.fetch_close_prices("BBB", range.0, range.1).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_volatility_grows_at_drift() {
        let source = SyntheticPriceSource::new(50.0, 0.252, 0.0, 1).unwrap();
        let points = source
            .fetch_close_prices("FLAT", date(2024, 1, 1), date(2024, 1, 5))
            .unwrap();
        // Four steps of dt = 1/252 at 25.2% drift.
        assert_relative_eq!(points[4].close, 50.0 * (0.004_f64).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_weekend_only_range_is_empty() {
        let source = SyntheticPriceSource::default();
        let err = source
            .fetch_close_prices("WKND", date(2024, 1, 6), date(2024, 1, 7))
            .unwrap_err();
        assert!(matches!(err, PriceSourceError::EmptyRange { .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = SyntheticPriceSource::default()
            .fetch_close_prices("X", date(2024, 2, 1), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, PriceSourceError::InvalidRange { .. }));
    }

    #[test]
    fn test_parameter_validation() {
        assert!(SyntheticPriceSource::new(0.0, 0.0, 0.2, 1).is_err());
        assert!(SyntheticPriceSource::new(100.0, f64::NAN, 0.2, 1).is_err());
        assert!(SyntheticPriceSource::new(100.0, 0.0, -0.2, 1).is_err());
    }
}
