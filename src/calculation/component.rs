//! Structure component evaluation.
//!
//! This module evaluates a single allowance or deduction component against
//! the monetary base the caller resolved for it. Fixed components pass
//! their amount through verbatim; percentage components are computed from
//! the supplied base and rounded once, since the evaluated amount is what
//! gets stored on the payslip line.

use crate::error::{EngineError, EngineResult};
use crate::models::ComponentKind;
use crate::money::Money;

/// Evaluates one component against its resolved base.
///
/// The caller resolves the component's declared base to a concrete amount
/// before calling: basic salary for allowances, gross pay or taxable
/// income for deductions. Fixed components need no base and ignore it.
///
/// # Arguments
///
/// * `component_id` - The component's id, used in error reporting.
/// * `kind` - How the component's amount is derived.
/// * `base` - The resolved base amount, required for percentage components.
///
/// # Returns
///
/// Returns the evaluated amount rounded to 2 decimals, or
/// `InvalidComponent` if the component's value is negative or a
/// percentage component has no base.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::evaluate_component;
/// use payroll_engine::models::{ComponentBase, ComponentKind};
///
/// let kind = ComponentKind::Percentage {
///     percent: "20".parse().unwrap(),
///     base: ComponentBase::BasicSalary,
/// };
/// let amount = evaluate_component("housing", &kind, Some("5000".parse().unwrap())).unwrap();
/// assert_eq!(amount, "1000".parse().unwrap());
/// ```
pub fn evaluate_component(
    component_id: &str,
    kind: &ComponentKind,
    base: Option<Money>,
) -> EngineResult<Money> {
    match kind {
        ComponentKind::Fixed { amount } => {
            if amount.is_negative() {
                return Err(EngineError::InvalidComponent {
                    component: component_id.to_string(),
                    message: format!("fixed amount may not be negative, got {}", amount),
                });
            }
            Ok(*amount)
        }
        ComponentKind::Percentage { percent, .. } => {
            if percent.is_sign_negative() {
                return Err(EngineError::InvalidComponent {
                    component: component_id.to_string(),
                    message: format!("percentage may not be negative, got {}", percent),
                });
            }
            let base = base.ok_or_else(|| EngineError::InvalidComponent {
                component: component_id.to_string(),
                message: "no base amount supplied for percentage component".to_string(),
            })?;
            Ok(base.percent_of(*percent).round_2())
        }
    }
}
