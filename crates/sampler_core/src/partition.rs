//! Static partitioning of a sample budget across workers.
//!
//! Every worker receives `floor(total / workers)` samples. The residual
//! `total mod workers` is discarded on every execution path, so a serial and
//! a parallel run of the same budget draw exactly the same number of samples.

use crate::error::{Result, SamplingError};

/// Validated total sample count and worker count.
///
/// # Examples
///
/// ```rust
/// use sampler_core::partition::SampleBudget;
///
/// let budget = SampleBudget::new(10, 3).unwrap();
/// assert_eq!(budget.shares(), vec![3, 3, 3]);
/// assert_eq!(budget.residual(), 1);
/// assert_eq!(budget.samples_drawn(), 9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleBudget {
    total_samples: usize,
    worker_count: usize,
}

impl SampleBudget {
    /// Validates the budget.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidBudget`] if either count is zero or
    /// there are more workers than samples.
    pub fn new(total_samples: usize, worker_count: usize) -> Result<Self> {
        let reason = if total_samples == 0 {
            Some("total_samples must be positive")
        } else if worker_count == 0 {
            Some("worker_count must be positive")
        } else if worker_count > total_samples {
            Some("worker_count exceeds total_samples, shares would be empty")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SamplingError::InvalidBudget {
                total_samples,
                worker_count,
                reason,
            }),
            None => Ok(Self {
                total_samples,
                worker_count,
            }),
        }
    }

    /// Returns the requested total sample count.
    #[inline]
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Returns the worker count.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Returns the per-worker share, `floor(total / workers)`.
    #[inline]
    pub fn share_size(&self) -> usize {
        self.total_samples / self.worker_count
    }

    /// Returns the samples discarded by integer division.
    #[inline]
    pub fn residual(&self) -> usize {
        self.total_samples % self.worker_count
    }

    /// Returns the number of samples actually drawn across all shares.
    #[inline]
    pub fn samples_drawn(&self) -> usize {
        self.share_size() * self.worker_count
    }

    /// Returns the `worker_count` equal shares.
    pub fn shares(&self) -> Vec<usize> {
        vec![self.share_size(); self.worker_count]
    }
}

/// Splits `total_samples` into `worker_count` equal shares.
///
/// # Errors
///
/// Returns [`SamplingError::InvalidBudget`] under the same conditions as
/// [`SampleBudget::new`].
///
/// # Examples
///
/// ```rust
/// use sampler_core::partition::partition;
///
/// assert_eq!(partition(100, 4).unwrap(), vec![25, 25, 25, 25]);
/// assert!(partition(3, 4).is_err());
/// ```
pub fn partition(total_samples: usize, worker_count: usize) -> Result<Vec<usize>> {
    SampleBudget::new(total_samples, worker_count).map(|budget| budget.shares())
}
