//! Sampling kernels.
//!
//! A kernel is a pure function run once per share: it performs `n`
//! independent draws from the injected random source and reduces them to a
//! partial result. Each kernel variant also fixes how its partials combine,
//! so the reduction cannot drift between serial and parallel execution.
//!
//! # Variants
//!
//! | Kernel | Partial | Estimate |
//! |--------|---------|----------|
//! | [`PiKernel`] | [`Tally`] of points inside the unit quarter circle | [`ScalarEstimate`] of π |
//! | [`IntegrationKernel`] | [`Tally`] of points under the curve | [`ScalarEstimate`] of the integral |
//! | [`FinanceKernel`] | [`PathBundle`] of simulated price paths | concatenated [`PathBundle`] |

mod finance;
mod integration;
mod pi;

pub use finance::{FinanceKernel, ReturnStatistics};
pub use integration::{Envelope, IntegrationKernel};
pub use pi::PiKernel;

use crate::error::Result;
use crate::rng::RandomSource;

/// Whether a kernel call only measures or also records its raw samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputMode {
    /// Return only the reduced value.
    #[default]
    Measure,
    /// Also return every sampled coordinate for export.
    Trace,
}

impl OutputMode {
    /// Returns `true` for [`OutputMode::Trace`].
    #[inline]
    pub fn is_trace(self) -> bool {
        matches!(self, Self::Trace)
    }
}

/// A pure per-share sampling function with a fixed reduction.
pub trait SampleKernel: Sync {
    /// Output of one share.
    type Partial: Send;
    /// Combined output of all shares.
    type Estimate;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Performs `samples` independent draws and reduces them.
    fn sample<R: RandomSource>(
        &self,
        samples: usize,
        output: OutputMode,
        rng: &mut R,
    ) -> Result<Self::Partial>;

    /// Combines the partials, ordered by share index, into the estimate.
    fn combine(&self, partials: Vec<Self::Partial>) -> Result<Self::Estimate>;
}

/// A sampled point in the kernel's own coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePoint {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

/// Raw hit count for one share of a rejection-sampling kernel.
///
/// Partials are never pre-divided proportions; the division happens once,
/// in aggregation, over the total number of samples drawn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    /// Draws that satisfied the acceptance test.
    pub hits: usize,
    /// Draws performed.
    pub samples: usize,
    /// Every draw, in draw order, when run in [`OutputMode::Trace`].
    pub trace: Vec<SamplePoint>,
}

impl Tally {
    /// Returns `hits / samples`, or `None` for an empty tally.
    pub fn proportion(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.hits as f64 / self.samples as f64)
    }
}

/// Final value of a scalar kernel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarEstimate {
    /// `scale × hits / samples`.
    pub value: f64,
    /// Total accepted draws across shares.
    pub hits: usize,
    /// Total draws across shares.
    pub samples: usize,
    /// Concatenated trace in share order (empty in measure mode).
    pub trace: Vec<SamplePoint>,
}

/// Simulated price paths, each `window_size + 1` prices long.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathBundle {
    /// Paths in generation order.
    pub paths: Vec<Vec<f64>>,
}

impl PathBundle {
    /// Returns the number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if there are no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the last price of every path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths.iter().filter_map(|p| p.last().copied()).collect()
    }

    /// Returns the mean terminal price, or `None` when empty.
    pub fn mean_terminal_price(&self) -> Option<f64> {
        let terminals = self.terminal_prices();
        (!terminals.is_empty()).then(|| terminals.iter().sum::<f64>() / terminals.len() as f64)
    }

    /// Returns the `q`-quantile (nearest rank) of terminal prices.
    ///
    /// `q` is clamped to [0, 1]. Returns `None` when empty.
    pub fn terminal_quantile(&self, q: f64) -> Option<f64> {
        let mut terminals = self.terminal_prices();
        if terminals.is_empty() {
            return None;
        }
        terminals.sort_by(|a, b| a.total_cmp(b));
        let rank = (q.clamp(0.0, 1.0) * (terminals.len() - 1) as f64).round() as usize;
        Some(terminals[rank])
    }
}
