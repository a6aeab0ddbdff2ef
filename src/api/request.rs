//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/payslip` and
//! `/payroll-run` endpoints. Pay structures arrive in their canonical
//! serialized form, so [`PayStructure`] is embedded directly rather than
//! mirrored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, PayPeriod, PayStructure, RosterEntry};

/// Request body for the `/payslip` endpoint.
///
/// Contains one employee, the structure to evaluate for them, and the pay
/// period the payslip covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipRequest {
    /// The employee information.
    pub employee: EmployeeRequest,
    /// The pay structure to evaluate.
    pub structure: PayStructure,
    /// The pay period for the calculation.
    pub pay_period: PayPeriodRequest,
}

/// Request body for the `/payroll-run` endpoint.
///
/// Contains the roster to process together with the shared pay period and
/// payment date. The run is created, processed, and completed within the
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunRequest {
    /// The pay period every payslip in the run covers.
    pub pay_period: PayPeriodRequest,
    /// The date payment is scheduled for.
    pub payment_date: NaiveDate,
    /// The employees to calculate, each with their structure.
    pub roster: Vec<RosterEntryRequest>,
}

/// Employee information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    #[serde(default)]
    pub name: String,
}

/// Pay period information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPeriodRequest {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

/// One roster entry in a payroll run request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntryRequest {
    /// The employee to calculate.
    pub employee: EmployeeRequest,
    /// The structure to evaluate for the employee.
    pub structure: PayStructure,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
        }
    }
}

impl From<PayPeriodRequest> for PayPeriod {
    fn from(req: PayPeriodRequest) -> Self {
        PayPeriod {
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

impl From<RosterEntryRequest> for RosterEntry {
    fn from(req: RosterEntryRequest) -> Self {
        RosterEntry {
            employee: req.employee.into(),
            structure: req.structure,
        }
    }
}
