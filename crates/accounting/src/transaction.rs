//! Transaction record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mizan_core::TransactionId;

/// Direction of a bookkeeping entry.
///
/// Serialized uppercase to match state written by earlier console versions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single ledger row. Append-only: rows are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    /// Positive amount in the smallest currency unit.
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
}
