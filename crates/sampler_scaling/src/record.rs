//! One row of a scaling sweep.

use serde::{Deserialize, Serialize};

/// CSV header of a scaling table, in field order.
pub const CSV_HEADER: [&str; 3] = ["worker_count", "achieved_speedup", "theoretical_speedup"];

/// Measured and theoretical speedup for one worker count.
///
/// Field order is the CSV column order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingRecord {
    /// Number of workers.
    pub worker_count: usize,
    /// `serial_time / parallel_time`.
    pub achieved_speedup: f64,
    /// Bound from the configured scaling law.
    pub theoretical_speedup: f64,
}

impl ScalingRecord {
    /// Returns `achieved_speedup / worker_count`.
    pub fn efficiency(&self) -> f64 {
        self.achieved_speedup / self.worker_count as f64
    }

    /// Returns `achieved_speedup / theoretical_speedup`.
    pub fn fraction_of_bound(&self) -> f64 {
        self.achieved_speedup / self.theoretical_speedup
    }

    /// Karp–Flatt metric: the experimentally determined serial fraction.
    ///
    /// `e = (1/S - 1/w) / (1 - 1/w)`. Undefined for one worker or a
    /// non-positive speedup.
    pub fn karp_flatt(&self) -> Option<f64> {
        if self.worker_count < 2 || self.achieved_speedup <= 0.0 {
            return None;
        }
        let inv_w = 1.0 / self.worker_count as f64;
        Some((1.0 / self.achieved_speedup - inv_w) / (1.0 - inv_w))
    }
}
