//! `mizan-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod confirm;
pub mod error;
pub mod id;

pub use confirm::Confirmation;
pub use error::{DomainError, DomainResult};
pub use id::{EmployeeId, InvoiceId, ProductId, TransactionId};
