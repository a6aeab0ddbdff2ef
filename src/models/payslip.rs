//! Payslip line item models.
//!
//! This module contains the [`PayslipLineItem`] type and its associated
//! structures that capture all outputs of a gross-to-net calculation:
//! evaluated components, statutory amounts, totals, and warnings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayPeriod, PayStructure};
use crate::money::Money;

/// The category a payslip component line belongs to.
///
/// Categories distinguish earnings from the different classes of deduction
/// so downstream renderers can group lines without re-deriving the
/// classification.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayComponentCategory;
///
/// let category = PayComponentCategory::Allowance;
/// assert_eq!(format!("{:?}", category), "Allowance");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayComponentCategory {
    /// An earning on top of basic salary.
    Allowance,
    /// A voluntary deduction subtracted before income tax.
    PreTaxDeduction,
    /// A voluntary deduction subtracted after income tax.
    PostTaxDeduction,
    /// A statutory deduction (income tax, pension, insurance).
    Statutory,
}

/// A single evaluated component line on a payslip.
///
/// Each line freezes the evaluated amount at calculation time; later edits
/// to the source structure never change a stored line.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentLine, PayComponentCategory};
/// use payroll_engine::money::Money;
///
/// let line = ComponentLine {
///     component_id: "housing".to_string(),
///     name: "Housing".to_string(),
///     category: PayComponentCategory::Allowance,
///     amount: "1000.00".parse().unwrap(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// The id of the component within its structure, or a statutory code.
    pub component_id: String,
    /// Human-readable name for payslip rendering.
    pub name: String,
    /// The category of the line.
    pub category: PayComponentCategory,
    /// The evaluated amount, rounded to 2 decimals.
    pub amount: Money,
}

/// Aggregated totals for a payslip calculation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayslipTotals;
/// use payroll_engine::money::Money;
///
/// let totals = PayslipTotals {
///     gross_pay: "6500.00".parse().unwrap(),
///     taxable_income: "5850.00".parse().unwrap(),
///     income_tax: "150.00".parse().unwrap(),
///     pension: "325.00".parse().unwrap(),
///     insurance: "100.00".parse().unwrap(),
///     pre_tax_deductions: "650.00".parse().unwrap(),
///     post_tax_deductions: "0.00".parse().unwrap(),
///     total_deductions: "1225.00".parse().unwrap(),
///     net_pay: "5275.00".parse().unwrap(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipTotals {
    /// Basic salary plus all allowances.
    pub gross_pay: Money,
    /// Gross pay minus non-statutory pre-tax deductions.
    pub taxable_income: Money,
    /// Income tax computed on taxable income.
    pub income_tax: Money,
    /// Pension contribution computed on gross pay.
    pub pension: Money,
    /// Insurance contribution computed on basic salary.
    pub insurance: Money,
    /// Non-statutory deductions subtracted before tax.
    pub pre_tax_deductions: Money,
    /// Non-statutory deductions subtracted after tax.
    pub post_tax_deductions: Money,
    /// Every deduction on the slip, statutory and voluntary.
    pub total_deductions: Money,
    /// Gross pay minus total deductions. May be negative.
    pub net_pay: Money,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation but may
/// require attention, such as a net pay below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl CalculationWarning {
    /// Warning code raised when deductions exceed gross pay.
    pub const NEGATIVE_NET_PAY: &'static str = "negative_net_pay";

    /// Builds the negative net pay warning for the given amount.
    pub fn negative_net_pay(net_pay: Money) -> Self {
        Self {
            code: Self::NEGATIVE_NET_PAY.to_string(),
            message: format!("net pay is negative: {}", net_pay),
            severity: "high".to_string(),
        }
    }
}

/// The complete result of a single employee's gross-to-net calculation.
///
/// Every amount and the source structure are value-frozen onto the item at
/// calculation time, so editing a structure later never rewrites a payslip
/// that was already produced.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayslipLineItem, PayslipTotals, PayPeriod, PayStructure, PayFrequency};
/// use payroll_engine::money::Money;
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let item = PayslipLineItem {
///     calculation_id: Uuid::new_v4(),
///     computed_at: Utc::now(),
///     engine_version: "1.0.0".to_string(),
///     employee_id: "emp_001".to_string(),
///     pay_period: PayPeriod {
///         start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///         end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
///     },
///     structure: PayStructure {
///         id: "struct_001".to_string(),
///         name: "Staff grade 3".to_string(),
///         basic_salary: "5000".parse().unwrap(),
///         allowances: vec![],
///         deductions: vec![],
///         frequency: PayFrequency::Monthly,
///     },
///     basic_salary: "5000".parse().unwrap(),
///     components: vec![],
///     totals: PayslipTotals {
///         gross_pay: "5000.00".parse().unwrap(),
///         taxable_income: "5000.00".parse().unwrap(),
///         income_tax: Money::ZERO,
///         pension: "250.00".parse().unwrap(),
///         insurance: "100.00".parse().unwrap(),
///         pre_tax_deductions: Money::ZERO,
///         post_tax_deductions: Money::ZERO,
///         total_deductions: "350.00".parse().unwrap(),
///         net_pay: "4650.00".parse().unwrap(),
///     },
///     warnings: vec![],
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLineItem {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the payslip is for.
    pub employee_id: String,
    /// The pay period the payslip covers.
    pub pay_period: PayPeriod,
    /// A snapshot of the structure exactly as evaluated.
    pub structure: PayStructure,
    /// The basic salary frozen at calculation time.
    pub basic_salary: Money,
    /// Every evaluated component line, in evaluation order.
    pub components: Vec<ComponentLine>,
    /// Aggregated totals for the payslip.
    pub totals: PayslipTotals,
    /// Any warnings generated during calculation.
    pub warnings: Vec<CalculationWarning>,
}

impl PayslipLineItem {
    /// Returns the component lines belonging to the given category.
    pub fn lines_in(&self, category: PayComponentCategory) -> impl Iterator<Item = &ComponentLine> {
        self.components
            .iter()
            .filter(move |line| line.category == category)
    }
}
