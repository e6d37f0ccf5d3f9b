//! # Sampler Scaling (Kernel Layer: Analysis)
//!
//! Measures how the wall-clock time of a Monte Carlo run scales with the
//! worker count and compares it with the Amdahl (strong scaling) or
//! Gustafson (weak scaling) bound.
//!
//! The serial and parallel fractions are an explicit
//! [`ScalingLawParameters`] value passed to each [`ScalingAnalyzer`], so
//! analyses with different assumptions can run side by side.
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::{PiKernel, RunConfig};
//! use sampler_scaling::{KernelWorkload, ScalingAnalyzer, ScalingLaw, ScalingLawParameters};
//!
//! let base = RunConfig::builder().total_samples(200_000).seed(1).build().unwrap();
//! let analyzer = ScalingAnalyzer::new(ScalingLaw::Amdahl, ScalingLawParameters::default())
//!     .with_range(2, 3)
//!     .unwrap();
//!
//! let report = analyzer.run(&KernelWorkload::new(PiKernel), &base).unwrap();
//! for record in &report.records {
//!     println!("{} workers: {:.2}x", record.worker_count, record.achieved_speedup);
//! }
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod laws;
pub mod record;

pub use analyzer::{
    speedup, KernelWorkload, ScalingAnalyzer, ScalingReport, Workload, DEFAULT_MAX_WORKERS,
    DEFAULT_MIN_WORKERS,
};
pub use laws::{ScalingLaw, ScalingLawParameters};
pub use record::{ScalingRecord, CSV_HEADER};
