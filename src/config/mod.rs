//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load statutory rule sets from
//! YAML files, including tax bands, pension rules, and insurance rates.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/reference").unwrap();
//! println!("Loaded rules: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    IncomeTaxRules, InsuranceRules, PensionRules, StatutoryConfig, StatutoryMetadata, TaxBand,
};
