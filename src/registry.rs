//! In-memory registry of pay structures and employee assignments.
//!
//! The registry is the configuration side of the engine: administrators
//! register structures, assign them to employees, and the run orchestrator
//! resolves each roster employee to a structure through it. Removal is
//! guarded so a structure still referenced by an assignment cannot vanish
//! underneath an employee.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::PayStructure;

/// Holds registered pay structures and employee-to-structure assignments.
///
/// The registry is a plain value; callers that share it across threads
/// wrap it in their own synchronization, as the API layer does.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayFrequency, PayStructure};
/// use payroll_engine::registry::StructureRegistry;
///
/// let mut registry = StructureRegistry::new();
/// registry.register(PayStructure {
///     id: "struct_001".to_string(),
///     name: "Staff grade 3".to_string(),
///     basic_salary: "5000".parse().unwrap(),
///     allowances: vec![],
///     deductions: vec![],
///     frequency: PayFrequency::Monthly,
/// }).unwrap();
///
/// registry.assign("emp_001", "struct_001").unwrap();
/// assert_eq!(registry.structure_for("emp_001").unwrap().id, "struct_001");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: HashMap<String, PayStructure>,
    assignments: HashMap<String, String>,
}

impl StructureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a structure, replacing any previous structure with the
    /// same id.
    ///
    /// The structure is validated before it is stored, so the registry
    /// never holds a structure the calculator would reject.
    pub fn register(&mut self, structure: PayStructure) -> EngineResult<()> {
        structure.validate()?;
        self.structures.insert(structure.id.clone(), structure);
        Ok(())
    }

    /// Looks up a structure by id.
    pub fn get(&self, structure_id: &str) -> EngineResult<&PayStructure> {
        self.structures
            .get(structure_id)
            .ok_or_else(|| EngineError::StructureNotFound {
                structure_id: structure_id.to_string(),
            })
    }

    /// Returns all registered structures in no particular order.
    pub fn structures(&self) -> impl Iterator<Item = &PayStructure> {
        self.structures.values()
    }

    /// Assigns a structure to an employee, replacing any previous
    /// assignment.
    pub fn assign(&mut self, employee_id: &str, structure_id: &str) -> EngineResult<()> {
        if !self.structures.contains_key(structure_id) {
            return Err(EngineError::StructureNotFound {
                structure_id: structure_id.to_string(),
            });
        }
        self.assignments
            .insert(employee_id.to_string(), structure_id.to_string());
        Ok(())
    }

    /// Removes an employee's assignment, returning the structure id that
    /// was assigned, if any.
    pub fn unassign(&mut self, employee_id: &str) -> Option<String> {
        self.assignments.remove(employee_id)
    }

    /// Resolves the structure assigned to an employee.
    pub fn structure_for(&self, employee_id: &str) -> EngineResult<&PayStructure> {
        let structure_id =
            self.assignments
                .get(employee_id)
                .ok_or_else(|| EngineError::EmployeeNotAssigned {
                    employee_id: employee_id.to_string(),
                })?;
        self.get(structure_id)
    }

    /// Returns how many employees are currently assigned to a structure.
    pub fn assigned_count(&self, structure_id: &str) -> usize {
        self.assignments
            .values()
            .filter(|assigned| assigned.as_str() == structure_id)
            .count()
    }

    /// Removes a structure.
    ///
    /// Fails with [`EngineError::StructureInUse`] if any employee is still
    /// assigned to it, and [`EngineError::StructureNotFound`] if it was
    /// never registered.
    pub fn remove(&mut self, structure_id: &str) -> EngineResult<PayStructure> {
        let assigned = self.assigned_count(structure_id);
        if assigned > 0 {
            return Err(EngineError::StructureInUse {
                structure_id: structure_id.to_string(),
                assigned,
            });
        }
        self.structures
            .remove(structure_id)
            .ok_or_else(|| EngineError::StructureNotFound {
                structure_id: structure_id.to_string(),
            })
    }
}
