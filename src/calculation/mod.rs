//! Calculation logic for the payroll engine.
//!
//! This module contains all the calculation functions for producing a
//! payslip, including structure component evaluation, progressive income
//! tax, pension and insurance contributions, and the gross-to-net
//! calculation that assembles them into a payslip line item.

mod component;
mod income_tax;
mod insurance;
mod payslip;
mod pension;

pub use component::evaluate_component;
pub use income_tax::{IncomeTaxResult, calculate_income_tax};
pub use insurance::calculate_insurance;
pub use payslip::{ENGINE_VERSION, calculate_payslip};
pub use pension::{PensionResult, calculate_pension};
