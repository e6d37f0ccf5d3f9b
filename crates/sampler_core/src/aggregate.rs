//! Reductions from ordered partial results to a final estimate.
//!
//! Scalar kernels report raw hit counts per share. They are summed, then
//! divided once by the total number of samples drawn and scaled:
//!
//! ```text
//! estimate = scale × Σ hits / Σ samples
//! ```
//!
//! With equal shares this is identical to averaging the per-share
//! proportions, so the serial path (one share) and the parallel path (W
//! shares) apply the same formula. Path kernels are concatenated in share
//! order without any numeric reduction.

use crate::error::{Result, SamplingError};
use crate::kernel::{PathBundle, ScalarEstimate, Tally};

/// Sums tallies in share order, concatenating their traces.
pub fn sum_tallies(partials: Vec<Tally>) -> Tally {
    partials
        .into_iter()
        .fold(Tally::default(), |mut acc, mut partial| {
            acc.hits += partial.hits;
            acc.samples += partial.samples;
            acc.trace.append(&mut partial.trace);
            acc
        })
}

/// Reduces hit-count partials to `scale × Σ hits / Σ samples`.
///
/// # Errors
///
/// Returns [`SamplingError::ArithmeticDegeneracy`] if no samples were drawn
/// or the scale is not finite.
///
/// # Examples
///
/// ```rust
/// use sampler_core::aggregate::reduce_scaled;
/// use sampler_core::kernel::Tally;
///
/// let partials = vec![
///     Tally { hits: 3, samples: 4, trace: vec![] },
///     Tally { hits: 4, samples: 4, trace: vec![] },
/// ];
/// let estimate = reduce_scaled(partials, 4.0).unwrap();
/// assert_eq!(estimate.value, 3.5);
/// ```
pub fn reduce_scaled(partials: Vec<Tally>, scale: f64) -> Result<ScalarEstimate> {
    if !scale.is_finite() {
        return Err(SamplingError::degenerate(
            "scalar aggregation",
            format!("scale factor {} is not finite", scale),
        ));
    }

    let total = sum_tallies(partials);
    if total.samples == 0 {
        return Err(SamplingError::degenerate(
            "scalar aggregation",
            "no samples were drawn",
        ));
    }

    Ok(ScalarEstimate {
        value: scale * total.hits as f64 / total.samples as f64,
        hits: total.hits,
        samples: total.samples,
        trace: total.trace,
    })
}

/// Mean of per-share proportions.
///
/// Only equal to [`reduce_scaled`] (with unit scale) when every share drew
/// the same number of samples, which the static partitioner guarantees.
pub fn mean_proportion(partials: &[Tally]) -> Option<f64> {
    let proportions: Vec<f64> = partials.iter().filter_map(Tally::proportion).collect();
    (!proportions.is_empty() && proportions.len() == partials.len())
        .then(|| proportions.iter().sum::<f64>() / proportions.len() as f64)
}

/// Concatenates path bundles in share order.
pub fn concat_paths(partials: Vec<PathBundle>) -> PathBundle {
    let capacity = partials.iter().map(PathBundle::len).sum();
    let mut paths = Vec::with_capacity(capacity);
    for mut partial in partials {
        paths.append(&mut partial.paths);
    }
    PathBundle { paths }
}
