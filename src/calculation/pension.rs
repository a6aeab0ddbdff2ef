//! Pension contribution calculation.
//!
//! This module computes the per-period pension contribution as a flat
//! percentage of gross pay up to a configured income threshold. Gross pay
//! above the threshold accrues nothing further, so the contribution holds
//! at the configured cap for every income at or above it.

use crate::config::PensionRules;
use crate::error::{EngineError, EngineResult};
use crate::money::Money;

/// The result of a pension contribution calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PensionResult {
    /// The contribution at full precision. Callers round at presentation.
    pub contribution: Money,
    /// True when the threshold or cap limited the contribution.
    pub capped: bool,
}

/// Calculates the pension contribution on a gross pay.
///
/// The rate applies to gross pay up to `income_threshold`; the part of
/// gross pay above the threshold is ignored. The result never exceeds
/// `cap`.
///
/// # Arguments
///
/// * `gross_pay` - The gross pay for the period. Must not be negative.
/// * `rules` - The configured pension rate, threshold, and cap.
///
/// # Returns
///
/// Returns the contribution and whether it was capped, or `InvalidInput`
/// if the gross pay is negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_pension;
/// use payroll_engine::config::PensionRules;
///
/// let rules = PensionRules {
///     rate: "5".parse().unwrap(),
///     income_threshold: "26840".parse().unwrap(),
///     cap: "1342".parse().unwrap(),
/// };
///
/// let result = calculate_pension("5000".parse().unwrap(), &rules).unwrap();
/// assert_eq!(result.contribution, "250".parse().unwrap());
/// assert!(!result.capped);
/// ```
pub fn calculate_pension(gross_pay: Money, rules: &PensionRules) -> EngineResult<PensionResult> {
    if gross_pay.is_negative() {
        return Err(EngineError::InvalidInput {
            formula: "pension".to_string(),
            message: format!("gross pay may not be negative, got {}", gross_pay),
        });
    }

    let pensionable = if gross_pay >= rules.income_threshold {
        rules.income_threshold
    } else {
        gross_pay
    };

    let mut contribution = pensionable.percent_of(rules.rate);
    let mut capped = pensionable < gross_pay;
    if contribution > rules.cap {
        contribution = rules.cap;
        capped = true;
    }

    Ok(PensionResult {
        contribution,
        capped,
    })
}
