//! # Adapter Prices (Adapter Layer: Input)
//!
//! Historical daily closes for the finance simulation.
//!
//! | Source | Origin |
//! |--------|--------|
//! | [`CsvPriceSource`] | `<data_dir>/<SYMBOL>.csv` exports with `Date` and `Close` columns |
//! | [`SyntheticPriceSource`] | seeded Geometric Brownian Motion on weekdays |
//!
//! Every failure is a [`PriceSourceError`], which converts into
//! [`sampler_core::SamplingError::DataUnavailable`] so a run aborts before
//! any simulation starts.
//!
//! ## Usage Example
//!
//! ```rust
//! use adapter_prices::{load_statistics, SyntheticPriceSource};
//! use chrono::NaiveDate;
//!
//! let source = SyntheticPriceSource::with_seed(42);
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
//!
//! let stats = load_statistics(&source, "DEMO", start, end).unwrap();
//! assert!(stats.observations > 200);
//! ```

#![warn(missing_docs)]

pub mod csv_source;
pub mod error;
pub mod source;
pub mod synthetic;

pub use csv_source::CsvPriceSource;
pub use error::{PriceSourceError, Result};
pub use source::{closes, load_statistics, PricePoint, PriceSource};
pub use synthetic::{SyntheticPriceSource, TRADING_DAYS_PER_YEAR};
