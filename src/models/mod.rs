//! Core data models for the payroll calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod payslip;
mod run;
mod structure;

pub use employee::Employee;
pub use pay_period::PayPeriod;
pub use payslip::{
    CalculationWarning, ComponentLine, PayComponentCategory, PayslipLineItem, PayslipTotals,
};
pub use run::{ItemError, PayrollRun, RosterEntry, RunStatus};
pub use structure::{
    AllowanceDefinition, ComponentBase, ComponentKind, DeductionDefinition, PayFrequency,
    PayStructure,
};
