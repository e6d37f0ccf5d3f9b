//! # Sampler Core (Kernel Layer: The Engine)
//!
//! Work partitioning, dispatch and aggregation for Monte Carlo estimators.
//!
//! ## Pipeline
//!
//! ```text
//! RunConfig ─► partition ─► WorkerPool::execute ─► SampleKernel::combine ─► Estimate
//!                 │                 │                       │
//!            floor(N/W)      one SamplerRng per       raw hit counts summed,
//!            per share       share, ordered results   divided once by Σ samples
//! ```
//!
//! Serial and parallel execution differ only in how shares are dispatched.
//! Both use the same partition, the same per-share seeds and the same
//! reduction, so their estimates agree.
//!
//! ## Modules
//!
//! - [`partition`]: static partitioning of a sample budget
//! - [`kernel`]: the [`SampleKernel`] trait and the π, integration and
//!   finance kernels
//! - [`pool`]: serial and rayon-parallel dispatch with per-share failure
//!   capture
//! - [`aggregate`]: reductions from partials to estimates
//! - [`timer`]: monotonic wall-clock measurement
//! - [`runner`]: one complete timed run
//! - [`rng`]: injected, seeded random sources
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::{ExecutionMode, IntegrationKernel, MonteCarloRunner, RunConfig};
//!
//! let kernel = IntegrationKernel::new(|x: f64| 2.0 * x, 1.0, 2.0, 0.01).unwrap();
//! let config = RunConfig::builder()
//!     .total_samples(100_000)
//!     .worker_count(4)
//!     .mode(ExecutionMode::Parallel)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let estimate = MonteCarloRunner::run(&kernel, &config).unwrap();
//! assert!((estimate.value.value - 3.0).abs() < 0.05);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for estimates, sample points and
//!   execution modes

#![warn(missing_docs)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod kernel;
pub mod partition;
pub mod pool;
pub mod rng;
pub mod runner;
pub mod timer;

pub use config::{ExecutionMode, RunConfig, RunConfigBuilder};
pub use error::{Result, SamplingError};
pub use kernel::{
    FinanceKernel, IntegrationKernel, OutputMode, PathBundle, PiKernel, ReturnStatistics,
    SampleKernel, ScalarEstimate, Tally,
};
pub use partition::{partition, SampleBudget};
pub use pool::WorkerPool;
pub use runner::{Estimate, MonteCarloRunner};
