//! Employee model.
//!
//! This module defines the [`Employee`] struct used on payroll run rosters.
//! The engine treats employee records as opaque references supplied by the
//! storage layer; only the identifier participates in calculation.

use serde::{Deserialize, Serialize};

/// Represents an employee selected for payroll calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name, carried through for payslip rendering downstream.
    #[serde(default)]
    pub name: String,
}

impl Employee {
    /// Creates a new employee reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "emp_001",
            "name": "A. Nguyen"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.name, "A. Nguyen");
    }

    #[test]
    fn test_name_defaults_to_empty() {
        let json = r#"{"id": "emp_002"}"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_002");
        assert!(employee.name.is_empty());
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = Employee::new("emp_003", "B. Okafor");
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }
}
