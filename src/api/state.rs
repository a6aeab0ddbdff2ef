//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::run::RunOrchestrator;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded statutory configuration and the run orchestrator built from it.
#[derive(Clone)]
pub struct AppState {
    /// The loaded statutory configuration.
    config: Arc<ConfigLoader>,
    /// The orchestrator processing payroll runs.
    orchestrator: Arc<RunOrchestrator>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        let orchestrator = RunOrchestrator::new(config.config().clone());
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a handle to the run orchestrator.
    pub fn orchestrator(&self) -> Arc<RunOrchestrator> {
        Arc::clone(&self.orchestrator)
    }
}
