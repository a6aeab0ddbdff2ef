//! Progressive income tax calculation.
//!
//! This module computes income tax over a configured set of marginal
//! bands. Each band covers income from the previous bound (inclusive) up
//! to its own bound (exclusive), and the tax is the sum of each band's
//! rate applied to the income falling inside it.

use rust_decimal::Decimal;

use crate::config::IncomeTaxRules;
use crate::error::{EngineError, EngineResult};
use crate::money::Money;

/// The result of an income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeTaxResult {
    /// The total tax at full precision. Callers round at presentation.
    pub tax: Money,
    /// The marginal rate of the band the income falls in.
    pub marginal_rate: Decimal,
}

/// Calculates progressive income tax on a taxable income.
///
/// Income exactly on a band boundary belongs to the higher band, which
/// makes no difference to the tax itself but determines the reported
/// marginal rate.
///
/// # Arguments
///
/// * `taxable_income` - The income to tax. Must not be negative.
/// * `rules` - The configured tax bands, ordered lowest to highest.
///
/// # Returns
///
/// Returns the total tax and marginal rate, or `InvalidInput` if the
/// income is negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::{IncomeTaxRules, TaxBand};
///
/// let rules = IncomeTaxRules {
///     bands: vec![
///         TaxBand { upper: Some("5100".parse().unwrap()), rate: "0".parse().unwrap() },
///         TaxBand { upper: Some("7100".parse().unwrap()), rate: "20".parse().unwrap() },
///         TaxBand { upper: None, rate: "30".parse().unwrap() },
///     ],
/// };
///
/// let result = calculate_income_tax("7100".parse().unwrap(), &rules).unwrap();
/// assert_eq!(result.tax, "400".parse().unwrap());
/// ```
pub fn calculate_income_tax(
    taxable_income: Money,
    rules: &IncomeTaxRules,
) -> EngineResult<IncomeTaxResult> {
    if taxable_income.is_negative() {
        return Err(EngineError::InvalidInput {
            formula: "income_tax".to_string(),
            message: format!("taxable income may not be negative, got {}", taxable_income),
        });
    }

    let mut tax = Money::ZERO;
    let mut lower = Money::ZERO;
    let mut marginal_rate = Decimal::ZERO;

    for band in &rules.bands {
        marginal_rate = band.rate;

        let span_top = match band.upper {
            Some(upper) if taxable_income >= upper => upper,
            _ => taxable_income,
        };
        if span_top > lower {
            tax += (span_top - lower).percent_of(band.rate);
        }

        match band.upper {
            Some(upper) if taxable_income >= upper => lower = upper,
            _ => break,
        }
    }

    Ok(IncomeTaxResult { tax, marginal_rate })
}
