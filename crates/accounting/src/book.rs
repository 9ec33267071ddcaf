//! Transaction book: append, bulk-clear and derived rollups.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use mizan_core::{DomainError, DomainResult, TransactionId};

use crate::transaction::{Transaction, TransactionKind};

/// Aggregate totals over the whole book.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub total_income: i64,
    pub total_expense: i64,
    pub net_profit: i64,
}

/// One month's income/expense bucket, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: i64,
    pub expense: i64,
}

/// Owns the flat transaction list. Individual rows have no update or delete;
/// the only removal is the bulk clear used by the admin surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionBook {
    transactions: Vec<Transaction>,
}

impl TransactionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Append a row after validation. Returns its assigned id.
    pub fn record(
        &mut self,
        description: &str,
        amount: i64,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> DomainResult<TransactionId> {
        if description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        if amount <= 0 {
            return Err(DomainError::validation("amount must be positive"));
        }

        let id = TransactionId::new();
        self.transactions.push(Transaction {
            id,
            description: description.trim().to_string(),
            amount,
            kind,
            date,
        });
        tracing::info!(transaction_id = %id, amount, ?kind, "transaction recorded");
        Ok(id)
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for tx in &self.transactions {
            match tx.kind {
                TransactionKind::Income => totals.total_income += tx.amount,
                TransactionKind::Expense => totals.total_expense += tx.amount,
            }
        }
        totals.net_profit = totals.total_income - totals.total_expense;
        totals
    }

    /// Month buckets in ascending `YYYY-MM` order (lexicographic is
    /// chronological for this format).
    pub fn monthly_series(&self) -> Vec<MonthlyFlow> {
        let mut months: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for tx in &self.transactions {
            let bucket = months.entry(tx.date.format("%Y-%m").to_string()).or_default();
            match tx.kind {
                TransactionKind::Income => bucket.0 += tx.amount,
                TransactionKind::Expense => bucket.1 += tx.amount,
            }
        }
        months
            .into_iter()
            .map(|(month, (income, expense))| MonthlyFlow {
                month,
                income,
                expense,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }
}
