//! Insurance contribution calculation.
//!
//! The insurance contribution is a flat percentage of basic salary. It
//! ignores allowances and deductions entirely, so two employees on the
//! same basic salary always contribute the same amount.

use crate::config::InsuranceRules;
use crate::error::{EngineError, EngineResult};
use crate::money::Money;

/// Calculates the insurance contribution on a basic salary.
///
/// # Arguments
///
/// * `basic_salary` - The basic salary for the period. Must not be negative.
/// * `rules` - The configured insurance rate.
///
/// # Returns
///
/// Returns the contribution at full precision, or `InvalidInput` if the
/// basic salary is negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_insurance;
/// use payroll_engine::config::InsuranceRules;
///
/// let rules = InsuranceRules { rate: "2".parse().unwrap() };
/// let contribution = calculate_insurance("5000".parse().unwrap(), &rules).unwrap();
/// assert_eq!(contribution, "100".parse().unwrap());
/// ```
pub fn calculate_insurance(basic_salary: Money, rules: &InsuranceRules) -> EngineResult<Money> {
    if basic_salary.is_negative() {
        return Err(EngineError::InvalidInput {
            formula: "insurance".to_string(),
            message: format!("basic salary may not be negative, got {}", basic_salary),
        });
    }

    Ok(basic_salary.percent_of(rules.rate))
}
