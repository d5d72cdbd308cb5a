//! TerraGenesis Configuration Module
//!
//! Loads planning thresholds, strategy texts and service settings from TOML.
//!
//! ## Loading Order
//!
//! 1. `--config <path>` or the `TERRAGENESIS_CONFIG` environment variable
//! 2. `terragenesis.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ```ignore
//! let config = TerraConfig::load(args.config.as_deref())?;
//! let planner = RegenerationPlanner::new(config.planning.clone());
//! ```

mod terra_config;
pub mod defaults;
pub mod validation;

pub use terra_config::*;
