//! Configuration types for statutory deduction rules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every rate and threshold
//! the statutory formulas use comes from here; nothing is hard-coded in the
//! formulas themselves.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::money::Money;

/// Metadata about a statutory rule set.
///
/// Identifies the jurisdiction and revision the rules were published under.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryMetadata {
    /// The human-readable name of the rule set.
    pub name: String,
    /// The jurisdiction code the rules apply to.
    pub jurisdiction: String,
    /// The version or effective date of the rules.
    pub version: String,
}

/// A single progressive income tax band.
///
/// A band covers income from the previous band's upper bound (inclusive)
/// up to its own `upper` bound (exclusive). The final band omits `upper`
/// and covers all remaining income.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBand {
    /// The exclusive upper bound of the band, or `None` for the top band.
    pub upper: Option<Money>,
    /// The marginal rate applied within the band, as a percentage.
    pub rate: Decimal,
}

/// Progressive income tax rules.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxRules {
    /// Tax bands ordered from lowest to highest income.
    pub bands: Vec<TaxBand>,
}

/// Pension contribution rules.
///
/// The contribution is a flat percentage of gross pay up to an income
/// threshold. Income above the threshold contributes nothing further, so
/// the contribution holds at `cap` for all incomes at or above it.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionRules {
    /// The contribution rate, as a percentage of gross pay.
    pub rate: Decimal,
    /// The gross income level above which no further contribution accrues.
    pub income_threshold: Money,
    /// The maximum contribution per pay period.
    pub cap: Money,
}

/// Insurance contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct InsuranceRules {
    /// The contribution rate, as a percentage of basic salary.
    pub rate: Decimal,
}

/// The complete statutory configuration loaded from YAML.
///
/// # Example
///
/// ```
/// use payroll_engine::config::StatutoryConfig;
///
/// let yaml = r#"
/// metadata:
///   name: "Reference rules"
///   jurisdiction: "REF"
///   version: "2026-01-01"
/// income_tax:
///   bands:
///     - upper: "5100"
///       rate: "0"
///     - rate: "20"
/// pension:
///   rate: "5"
///   income_threshold: "26840"
///   cap: "1342"
/// insurance:
///   rate: "2"
/// "#;
/// let config: StatutoryConfig = serde_yaml::from_str(yaml).unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// Rule set metadata.
    pub metadata: StatutoryMetadata,
    /// Progressive income tax rules.
    pub income_tax: IncomeTaxRules,
    /// Pension contribution rules.
    pub pension: PensionRules,
    /// Insurance contribution rules.
    pub insurance: InsuranceRules,
}

impl StatutoryConfig {
    /// Checks the rule set for internal consistency.
    ///
    /// Returns a description of the first problem found: an empty band
    /// list, a non-final band without an upper bound, bounds that are not
    /// strictly increasing, a negative rate, or a non-positive pension
    /// threshold.
    pub fn validate(&self) -> Result<(), String> {
        let bands = &self.income_tax.bands;
        if bands.is_empty() {
            return Err("income tax rules must define at least one band".to_string());
        }

        let mut previous_upper: Option<Money> = None;
        for (index, band) in bands.iter().enumerate() {
            if band.rate.is_sign_negative() {
                return Err(format!("tax band {} has a negative rate", index));
            }
            match band.upper {
                Some(upper) => {
                    if index == bands.len() - 1 {
                        return Err("the final tax band must not have an upper bound".to_string());
                    }
                    if let Some(previous) = previous_upper {
                        if upper <= previous {
                            return Err(format!(
                                "tax band upper bounds must be strictly increasing, {} follows {}",
                                upper, previous
                            ));
                        }
                    }
                    if upper.is_negative() || upper.is_zero() {
                        return Err(format!("tax band {} upper bound must be positive", index));
                    }
                    previous_upper = Some(upper);
                }
                None => {
                    if index != bands.len() - 1 {
                        return Err(format!(
                            "tax band {} omits an upper bound but is not the final band",
                            index
                        ));
                    }
                }
            }
        }

        if self.pension.rate.is_sign_negative() {
            return Err("pension rate may not be negative".to_string());
        }
        if self.pension.income_threshold.is_negative() || self.pension.income_threshold.is_zero() {
            return Err("pension income threshold must be positive".to_string());
        }
        if self.pension.cap.is_negative() {
            return Err("pension cap may not be negative".to_string());
        }
        if self.insurance.rate.is_sign_negative() {
            return Err("insurance rate may not be negative".to_string());
        }

        Ok(())
    }
}
