//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! rule sets from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{InsuranceRules, IncomeTaxRules, PensionRules, StatutoryConfig, StatutoryMetadata};

/// Loads and provides access to a statutory rule set.
///
/// The `ConfigLoader` reads a YAML configuration file from a directory and
/// provides methods to query the tax, pension, and insurance rules.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/reference/
/// └── statutory.yaml   # Tax bands, pension, and insurance rules
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/reference").unwrap();
/// println!("Rules: {} ({})", loader.metadata().name, loader.metadata().version);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: StatutoryConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/reference")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The statutory.yaml file is missing
    /// - The file contains invalid YAML
    /// - The rule set fails consistency validation
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/reference")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let statutory_path = path.as_ref().join("statutory.yaml");
        let config = Self::load_yaml::<StatutoryConfig>(&statutory_path)?;

        config
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: statutory_path.display().to_string(),
                message,
            })?;

        Ok(Self { config })
    }

    /// Builds a loader from an already-parsed rule set.
    ///
    /// Useful for tests and embedded deployments that carry their rules
    /// inline rather than on disk.
    pub fn from_config(config: StatutoryConfig) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message,
            })?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying statutory configuration.
    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &StatutoryMetadata {
        &self.config.metadata
    }

    /// Returns the progressive income tax rules.
    pub fn income_tax(&self) -> &IncomeTaxRules {
        &self.config.income_tax
    }

    /// Returns the pension contribution rules.
    pub fn pension(&self) -> &PensionRules {
        &self.config.pension
    }

    /// Returns the insurance contribution rules.
    pub fn insurance(&self) -> &InsuranceRules {
        &self.config.insurance
    }
}
