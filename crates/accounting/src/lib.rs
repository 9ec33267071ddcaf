//! `mizan-accounting` — flat income/expense book and aggregate rollups.

pub mod book;
pub mod transaction;

pub use book::{MonthlyFlow, Totals, TransactionBook};
pub use transaction::{Transaction, TransactionKind};
