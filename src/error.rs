//! Error types for the payroll calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payslip calculation and
//! payroll run orchestration.

use thiserror::Error;
use uuid::Uuid;

use crate::models::RunStatus;

/// The main error type for the payroll calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/statutory.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/statutory.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A monetary amount was invalid (negative where disallowed, or not a
    /// finite decimal).
    #[error("Invalid amount: {message}")]
    InvalidAmount {
        /// A description of what made the amount invalid.
        message: String,
    },

    /// A structure component was malformed or could not be evaluated.
    #[error("Invalid component '{component}': {message}")]
    InvalidComponent {
        /// The name or id of the offending component.
        component: String,
        /// A description of what made the component invalid.
        message: String,
    },

    /// A pay structure was malformed or contained inconsistent data.
    #[error("Invalid structure '{structure_id}': {message}")]
    InvalidStructure {
        /// The id of the invalid structure.
        structure_id: String,
        /// A description of what made the structure invalid.
        message: String,
    },

    /// A statutory formula received an out-of-domain input.
    #[error("Invalid input to {formula}: {message}")]
    InvalidInput {
        /// The statutory formula that rejected the input.
        formula: String,
        /// A description of the invalid input.
        message: String,
    },

    /// A payroll run operation was attempted from an illegal state.
    #[error("Cannot {action} a payroll run in state {from}")]
    InvalidTransition {
        /// The state the run was in.
        from: RunStatus,
        /// The operation that was attempted.
        action: String,
    },

    /// A payroll run finished with roster entries that produced neither an
    /// item nor a recorded error.
    #[error("Payroll run {run_id} is incomplete: {missing} roster entries unaccounted for")]
    IncompleteRun {
        /// The id of the incomplete run.
        run_id: Uuid,
        /// How many roster entries have no item and no error.
        missing: usize,
    },

    /// A structure was requested that is not registered.
    #[error("Structure not found: {structure_id}")]
    StructureNotFound {
        /// The structure id that was not found.
        structure_id: String,
    },

    /// An employee was put on a roster without an assigned structure.
    #[error("Employee {employee_id} has no assigned pay structure")]
    EmployeeNotAssigned {
        /// The employee id with no assignment.
        employee_id: String,
    },

    /// A structure could not be removed because employees still reference it.
    #[error("Structure '{structure_id}' is assigned to {assigned} employee(s) and cannot be removed")]
    StructureInUse {
        /// The structure id that is still referenced.
        structure_id: String,
        /// How many employees currently reference the structure.
        assigned: usize,
    },

    /// A payroll run's fan-in barrier timed out before all workers reported.
    #[error("Payroll run {run_id} timed out: {completed} of {expected} results received")]
    RunTimedOut {
        /// The id of the run that timed out.
        run_id: Uuid,
        /// How many results were received before the deadline.
        completed: usize,
        /// How many results were expected.
        expected: usize,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
