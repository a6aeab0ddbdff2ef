//! Pay structure and component definitions.
//!
//! This module defines the configurable salary structure an administrator
//! assigns to employees: a basic salary plus ordered lists of allowance and
//! deduction components. Component shapes are a tagged sum type so the
//! evaluator matches them exhaustively at compile time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::money::Money;

/// The reference amount a percentage component is computed against.
///
/// The base is declared explicitly on each percentage component rather than
/// implied by its position in the structure. Allowances conventionally use
/// [`ComponentBase::BasicSalary`] and deductions [`ComponentBase::GrossPay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentBase {
    /// The structure's basic salary.
    BasicSalary,
    /// Basic salary plus all allowances.
    GrossPay,
    /// Gross pay minus non-statutory pre-tax deductions.
    TaxableIncome,
}

/// How a component's amount is derived.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentBase, ComponentKind};
///
/// let housing = ComponentKind::Percentage {
///     percent: "20".parse().unwrap(),
///     base: ComponentBase::BasicSalary,
/// };
/// assert!(matches!(housing, ComponentKind::Percentage { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    /// A fixed amount paid or deducted verbatim.
    Fixed {
        /// The fixed amount.
        amount: Money,
    },
    /// A percentage of a declared base amount.
    Percentage {
        /// The percentage value (e.g. `20` for 20%).
        percent: Decimal,
        /// The base the percentage is computed against.
        base: ComponentBase,
    },
}

/// An allowance component of a pay structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceDefinition {
    /// Unique identifier of the component within its structure.
    pub id: String,
    /// Human-readable name (e.g. "Housing").
    pub name: String,
    /// How the allowance amount is derived.
    pub kind: ComponentKind,
}

/// A deduction component of a pay structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionDefinition {
    /// Unique identifier of the component within its structure.
    pub id: String,
    /// Human-readable name (e.g. "Union dues").
    pub name: String,
    /// How the deduction amount is derived.
    pub kind: ComponentKind,
    /// Whether the deduction is subtracted before income tax is computed.
    #[serde(default)]
    pub pre_tax: bool,
}

/// How often the structure pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Paid once per calendar month.
    Monthly,
    /// Paid every two weeks.
    Biweekly,
    /// Paid every week.
    Weekly,
}

/// A configurable salary structure.
///
/// Structures are owned by configuration, assigned to zero or many
/// employees, and value-frozen onto each payslip line item at calculation
/// time so later edits never rewrite history.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     AllowanceDefinition, ComponentBase, ComponentKind, PayFrequency, PayStructure,
/// };
/// use payroll_engine::money::Money;
///
/// let structure = PayStructure {
///     id: "struct_001".to_string(),
///     name: "Staff grade 3".to_string(),
///     basic_salary: "5000".parse().unwrap(),
///     allowances: vec![AllowanceDefinition {
///         id: "housing".to_string(),
///         name: "Housing".to_string(),
///         kind: ComponentKind::Percentage {
///             percent: "20".parse().unwrap(),
///             base: ComponentBase::BasicSalary,
///         },
///     }],
///     deductions: vec![],
///     frequency: PayFrequency::Monthly,
/// };
/// assert!(structure.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayStructure {
    /// Unique identifier for the structure.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The basic salary per pay period. Must be strictly positive.
    pub basic_salary: Money,
    /// Allowance components, evaluated in order.
    #[serde(default)]
    pub allowances: Vec<AllowanceDefinition>,
    /// Deduction components, evaluated in order.
    #[serde(default)]
    pub deductions: Vec<DeductionDefinition>,
    /// How often the structure pays out.
    pub frequency: PayFrequency,
}

impl PayStructure {
    /// Validates the structure before calculation.
    ///
    /// Fails with [`EngineError::InvalidStructure`] if the basic salary is
    /// not strictly positive or any component carries a negative value.
    pub fn validate(&self) -> EngineResult<()> {
        if self.basic_salary.is_negative() || self.basic_salary.is_zero() {
            return Err(EngineError::InvalidStructure {
                structure_id: self.id.clone(),
                message: format!(
                    "basic salary must be positive, got {}",
                    self.basic_salary
                ),
            });
        }

        for (component_id, kind) in self
            .allowances
            .iter()
            .map(|a| (&a.id, &a.kind))
            .chain(self.deductions.iter().map(|d| (&d.id, &d.kind)))
        {
            if let Some(message) = component_value_error(kind) {
                return Err(EngineError::InvalidStructure {
                    structure_id: self.id.clone(),
                    message: format!("component '{}': {}", component_id, message),
                });
            }
        }

        Ok(())
    }
}

fn component_value_error(kind: &ComponentKind) -> Option<String> {
    match kind {
        ComponentKind::Fixed { amount } if amount.is_negative() => {
            Some(format!("fixed amount may not be negative, got {}", amount))
        }
        ComponentKind::Percentage { percent, .. } if percent.is_sign_negative() => {
            Some(format!("percentage may not be negative, got {}", percent))
        }
        _ => None,
    }
}
