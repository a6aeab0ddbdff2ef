//! Gross-to-net payslip calculation.
//!
//! This module assembles a complete [`PayslipLineItem`] for one employee
//! from their pay structure and the statutory rule set. The calculation is
//! pure: the same inputs always produce the same amounts, so items for
//! different employees can be computed in parallel.

use chrono::Utc;
use uuid::Uuid;

use crate::config::StatutoryConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationWarning, ComponentBase, ComponentKind, ComponentLine, Employee,
    PayComponentCategory, PayPeriod, PayStructure, PayslipLineItem, PayslipTotals,
};
use crate::money::Money;

use super::component::evaluate_component;
use super::income_tax::calculate_income_tax;
use super::insurance::calculate_insurance;
use super::pension::calculate_pension;

/// The engine version stamped onto every payslip item.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Calculates a complete payslip for one employee.
///
/// The calculation proceeds in a fixed order: allowances are evaluated
/// against basic salary to form gross pay; pre-tax deductions are
/// evaluated against the undiminished gross; taxable income is gross
/// minus those pre-tax deductions; the statutory amounts are computed on
/// taxable income, gross pay, and basic salary respectively; post-tax
/// deductions are evaluated last. Every stored amount is rounded exactly
/// once as it lands on the item, so component lines always sum to the
/// reported totals.
///
/// Percentage deductions are evaluated once against the undiminished
/// gross even though pre-tax deductions then reduce the taxable base.
/// There is no fixed-point iteration.
///
/// # Arguments
///
/// * `employee` - The employee the payslip is for.
/// * `structure` - The pay structure to evaluate. Snapshotted onto the item.
/// * `pay_period` - The period the payslip covers.
/// * `statutory` - The statutory rule set for tax, pension, and insurance.
///
/// # Returns
///
/// Returns the computed item, or an error if the structure is invalid,
/// a component cannot be evaluated, or a statutory formula rejects its
/// input. A negative net pay is not an error; it is reported as a
/// warning on the item.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::calculate_payslip;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{Employee, PayFrequency, PayPeriod, PayStructure};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/reference")?;
/// let employee = Employee::new("emp_001", "A. Nguyen");
/// let structure = PayStructure {
///     id: "struct_001".to_string(),
///     name: "Staff grade 3".to_string(),
///     basic_salary: "5000".parse().unwrap(),
///     allowances: vec![],
///     deductions: vec![],
///     frequency: PayFrequency::Monthly,
/// };
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
///
/// let item = calculate_payslip(&employee, &structure, period, loader.config())?;
/// println!("net pay: {}", item.totals.net_pay);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn calculate_payslip(
    employee: &Employee,
    structure: &PayStructure,
    pay_period: PayPeriod,
    statutory: &StatutoryConfig,
) -> EngineResult<PayslipLineItem> {
    structure.validate()?;

    let basic_salary = structure.basic_salary.round_2();
    let mut components = Vec::new();

    // Allowances see only basic salary; gross pay does not exist yet.
    let mut allowances_total = Money::ZERO;
    for allowance in &structure.allowances {
        let base = resolve_base(&allowance.kind, basic_salary, None, None);
        let amount = evaluate_component(&allowance.id, &allowance.kind, base)?;
        allowances_total += amount;
        components.push(ComponentLine {
            component_id: allowance.id.clone(),
            name: allowance.name.clone(),
            category: PayComponentCategory::Allowance,
            amount,
        });
    }

    let gross_pay = basic_salary + allowances_total;

    // Pre-tax deductions are evaluated against the undiminished gross.
    let mut pre_tax_total = Money::ZERO;
    for deduction in structure.deductions.iter().filter(|d| d.pre_tax) {
        let base = resolve_base(&deduction.kind, basic_salary, Some(gross_pay), None);
        let amount = evaluate_component(&deduction.id, &deduction.kind, base)?;
        pre_tax_total += amount;
        components.push(ComponentLine {
            component_id: deduction.id.clone(),
            name: deduction.name.clone(),
            category: PayComponentCategory::PreTaxDeduction,
            amount,
        });
    }

    let taxable_income = gross_pay - pre_tax_total;

    let income_tax = calculate_income_tax(taxable_income, &statutory.income_tax)?
        .tax
        .round_2();
    let pension = calculate_pension(gross_pay, &statutory.pension)?
        .contribution
        .round_2();
    let insurance = calculate_insurance(basic_salary, &statutory.insurance)?.round_2();

    components.push(ComponentLine {
        component_id: "income_tax".to_string(),
        name: "Income tax".to_string(),
        category: PayComponentCategory::Statutory,
        amount: income_tax,
    });
    components.push(ComponentLine {
        component_id: "pension".to_string(),
        name: "Pension contribution".to_string(),
        category: PayComponentCategory::Statutory,
        amount: pension,
    });
    components.push(ComponentLine {
        component_id: "insurance".to_string(),
        name: "Insurance levy".to_string(),
        category: PayComponentCategory::Statutory,
        amount: insurance,
    });

    let mut post_tax_total = Money::ZERO;
    for deduction in structure.deductions.iter().filter(|d| !d.pre_tax) {
        let base = resolve_base(
            &deduction.kind,
            basic_salary,
            Some(gross_pay),
            Some(taxable_income),
        );
        let amount = evaluate_component(&deduction.id, &deduction.kind, base)?;
        post_tax_total += amount;
        components.push(ComponentLine {
            component_id: deduction.id.clone(),
            name: deduction.name.clone(),
            category: PayComponentCategory::PostTaxDeduction,
            amount,
        });
    }

    let total_deductions = pre_tax_total + income_tax + pension + insurance + post_tax_total;
    let net_pay = (gross_pay - total_deductions).round_2();

    let mut warnings = Vec::new();
    if net_pay.is_negative() {
        warnings.push(CalculationWarning::negative_net_pay(net_pay));
    }

    Ok(PayslipLineItem {
        calculation_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        employee_id: employee.id.clone(),
        pay_period,
        structure: structure.clone(),
        basic_salary,
        components,
        totals: PayslipTotals {
            gross_pay,
            taxable_income,
            income_tax,
            pension,
            insurance,
            pre_tax_deductions: pre_tax_total,
            post_tax_deductions: post_tax_total,
            total_deductions,
            net_pay,
        },
        warnings,
    })
}

/// Resolves a percentage component's declared base to a concrete amount,
/// if that base exists at the current evaluation stage.
fn resolve_base(
    kind: &ComponentKind,
    basic_salary: Money,
    gross_pay: Option<Money>,
    taxable_income: Option<Money>,
) -> Option<Money> {
    match kind {
        ComponentKind::Fixed { .. } => None,
        ComponentKind::Percentage { base, .. } => match base {
            ComponentBase::BasicSalary => Some(basic_salary),
            ComponentBase::GrossPay => gross_pay,
            ComponentBase::TaxableIncome => taxable_income,
        },
    }
}
