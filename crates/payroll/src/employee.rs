//! Employee records and the payroll registry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mizan_core::{Confirmation, DomainError, DomainResult, EmployeeId};

/// A payroll employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    /// Monthly salary in the smallest currency unit.
    pub salary: i64,
    pub join_date: NaiveDate,
}

/// Expense row derived from paying one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryExpense {
    pub description: String,
    pub amount: i64,
}

impl Employee {
    /// Derive the expense row for this employee's salary in `month_label`
    /// (e.g. "January 2026").
    pub fn salary_expense(&self, month_label: &str) -> SalaryExpense {
        SalaryExpense {
            description: format!("Salary payment to {} ({month_label})", self.name),
            amount: self.salary,
        }
    }
}

/// Owns the employee list. Serialized transparently as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeRegistry {
    employees: Vec<Employee>,
}

impl EmployeeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn add(
        &mut self,
        name: &str,
        position: &str,
        salary: i64,
        join_date: NaiveDate,
    ) -> DomainResult<EmployeeId> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("employee name cannot be empty"));
        }
        if position.trim().is_empty() {
            return Err(DomainError::validation("position cannot be empty"));
        }
        if salary <= 0 {
            return Err(DomainError::validation("salary must be positive"));
        }

        let id = EmployeeId::new();
        self.employees.push(Employee {
            id,
            name: name.trim().to_string(),
            position: position.trim().to_string(),
            salary,
            join_date,
        });
        tracing::info!(employee_id = %id, "employee added");
        Ok(id)
    }

    /// Replace an employee record by id.
    pub fn update(&mut self, updated: Employee) -> DomainResult<()> {
        if updated.salary <= 0 {
            return Err(DomainError::validation("salary must be positive"));
        }
        let slot = self
            .employees
            .iter_mut()
            .find(|e| e.id == updated.id)
            .ok_or(DomainError::NotFound)?;
        *slot = updated;
        Ok(())
    }

    /// Confirmation-gated removal. Returns whether a record was removed;
    /// a declined confirmation performs no mutation.
    pub fn remove(&mut self, id: EmployeeId, confirmation: Confirmation) -> DomainResult<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let before = self.employees.len();
        self.employees.retain(|e| e.id != id);
        if self.employees.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.employees.clear();
    }
}
