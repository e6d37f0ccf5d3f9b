//! Simulated price paths driven by historical daily log returns.
//!
//! # Model
//!
//! ```text
//! r[i]        = ln(close[i] / close[i-1])
//! drift       = mean(r) - var(r) / 2
//! price[t+1]  = price[t] × exp(drift + σ × Z),   Z ~ N(0, 1)
//! ```
//!
//! `var` is the population variance and `σ = sqrt(var)`. Each path starts at
//! the last observed close.

use super::{OutputMode, PathBundle, SampleKernel};
use crate::aggregate::concat_paths;
use crate::error::{Result, SamplingError};
use crate::rng::RandomSource;

/// Daily return statistics of a historical close series.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturnStatistics {
    /// Last observed close, the starting price of every path.
    pub last_price: f64,
    /// Mean daily log return.
    pub mean_return: f64,
    /// Population variance of daily log returns.
    pub variance: f64,
    /// Number of returns the statistics were computed from.
    pub observations: usize,
}

impl ReturnStatistics {
    /// Computes statistics from closes ordered oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::DataUnavailable`] if fewer than two closes
    /// are given or any close is not a positive finite number.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::kernel::ReturnStatistics;
    ///
    /// let stats = ReturnStatistics::from_closes("DEMO", &[100.0, 110.0, 121.0]).unwrap();
    /// assert_eq!(stats.last_price, 121.0);
    /// assert!(stats.variance.abs() < 1e-12);
    /// ```
    pub fn from_closes(symbol: &str, closes: &[f64]) -> Result<Self> {
        if closes.len() < 2 {
            return Err(SamplingError::data_unavailable(
                symbol,
                format!("{} close(s) available, at least 2 are required", closes.len()),
            ));
        }
        if let Some((index, close)) = closes
            .iter()
            .enumerate()
            .find(|(_, c)| !(c.is_finite() && **c > 0.0))
        {
            return Err(SamplingError::data_unavailable(
                symbol,
                format!("close #{} = {} is not a positive price", index, close),
            ));
        }

        let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
        let n = returns.len() as f64;
        let mean_return = returns.iter().sum::<f64>() / n;
        let variance = returns
            .iter()
            .map(|r| (r - mean_return).powi(2))
            .sum::<f64>()
            / n;

        Ok(Self {
            last_price: closes[closes.len() - 1],
            mean_return,
            variance,
            observations: returns.len(),
        })
    }

    /// Returns `mean - variance / 2`.
    #[inline]
    pub fn drift(&self) -> f64 {
        self.mean_return - 0.5 * self.variance
    }

    /// Returns the standard deviation of daily log returns.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Generates `window_size`-step price paths from a starting price.
///
/// The trace mode has no effect here: the generated paths are already the
/// raw samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinanceKernel {
    start_price: f64,
    drift: f64,
    volatility: f64,
    window_size: usize,
}

impl FinanceKernel {
    /// Creates a kernel with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidParameter`] if the start price is not
    /// positive, the drift or volatility is not finite, the volatility is
    /// negative, or the window is empty.
    pub fn new(start_price: f64, drift: f64, volatility: f64, window_size: usize) -> Result<Self> {
        if !(start_price.is_finite() && start_price > 0.0) {
            return Err(SamplingError::invalid_parameter(
                "start_price",
                format!("{} must be positive and finite", start_price),
            ));
        }
        if !drift.is_finite() {
            return Err(SamplingError::invalid_parameter(
                "drift",
                format!("{} must be finite", drift),
            ));
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(SamplingError::invalid_parameter(
                "volatility",
                format!("{} must be non-negative and finite", volatility),
            ));
        }
        if window_size == 0 {
            return Err(SamplingError::invalid_parameter(
                "window_size",
                "must be at least one step",
            ));
        }

        Ok(Self {
            start_price,
            drift,
            volatility,
            window_size,
        })
    }

    /// Creates a kernel from historical return statistics.
    pub fn from_statistics(stats: &ReturnStatistics, window_size: usize) -> Result<Self> {
        Self::new(stats.last_price, stats.drift(), stats.volatility(), window_size)
    }

    /// Returns the starting price of every path.
    #[inline]
    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    /// Returns the per-step drift.
    #[inline]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Returns the per-step volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the number of simulated steps per path.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl SampleKernel for FinanceKernel {
    type Partial = PathBundle;
    type Estimate = PathBundle;

    fn name(&self) -> &'static str {
        "finance"
    }

    fn sample<R: RandomSource>(
        &self,
        samples: usize,
        _output: OutputMode,
        rng: &mut R,
    ) -> Result<PathBundle> {
        let mut paths = Vec::with_capacity(samples);
        for _ in 0..samples {
            let mut path = Vec::with_capacity(self.window_size + 1);
            let mut price = self.start_price;
            path.push(price);
            for _ in 0..self.window_size {
                let z = rng.next_normal();
                price *= (self.drift + self.volatility * z).exp();
                path.push(price);
            }
            paths.push(path);
        }
        Ok(PathBundle { paths })
    }

    fn combine(&self, partials: Vec<PathBundle>) -> Result<PathBundle> {
        Ok(concat_paths(partials))
    }
}
