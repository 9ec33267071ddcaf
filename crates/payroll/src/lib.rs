//! `mizan-payroll` — employee registry and salary expense derivation.
//!
//! Peripheral CRUD ledger. Paying a salary records an expense in the
//! transaction book; the registry only derives the expense row.

pub mod employee;

pub use employee::{Employee, EmployeeRegistry, SalaryExpense};
