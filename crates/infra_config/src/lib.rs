//! # Infra Config (Infra Layer: Foundation)
//!
//! Configuration for Monte Carlo runs and scaling sweeps.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file ([`DEFAULT_CONFIG_FILE`] or an explicit path)
//! 3. `MCSIM_*` environment variables
//!
//! Command-line flags are applied on top by the binary.
//!
//! ## Usage Example
//!
//! ```rust
//! use infra_config::SimulationConfig;
//!
//! let config: SimulationConfig = toml::from_str(
//!     r#"
//!     [run]
//!     total_samples = 10000
//!     worker_count = 2
//!     mode = "serial"
//!     "#,
//! )
//! .unwrap();
//!
//! config.validate().unwrap();
//! let run = config.run_config().unwrap();
//! assert_eq!(run.budget().share_size(), 5000);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod integrand;
pub mod settings;

pub use error::{ConfigError, Result};
pub use integrand::NamedIntegrand;
pub use settings::{
    FinanceSection, IntegrationSection, OutputSection, PriceSourceKind, RunSection,
    ScalingSection, SimulationConfig, DEFAULT_CONFIG_FILE, ENV_PREFIX,
};
