//! `mizan-invoicing` — invoice lifecycle and its cross-ledger side effects.
//!
//! Creating an invoice is the one operation that touches three ledgers at
//! once: it decrements catalog stock, may record an income transaction, and
//! appends the invoice itself. Those effects happen exactly once, at creation
//! time; edits and deletes deliberately leave stock and transactions alone.

pub mod engine;
pub mod invoice;

pub use engine::{InvoiceBook, RecencyPartition, ARCHIVE_AFTER_DAYS};
pub use invoice::{Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus};
