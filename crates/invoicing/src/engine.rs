//! Invoice book: CRUD, status transitions and the creation-time side effects
//! on the catalog and the transaction book.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mizan_accounting::{TransactionBook, TransactionKind};
use mizan_core::{Confirmation, DomainError, DomainResult, InvoiceId, ProductId};
use mizan_inventory::Catalog;

use crate::invoice::{Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus};

/// Invoices older than this many days fall into the archived partition.
pub const ARCHIVE_AFTER_DAYS: i64 = 30;

/// Display grouping of invoices by age. Not a storage distinction.
#[derive(Debug, Default)]
pub struct RecencyPartition<'a> {
    pub recent: Vec<&'a Invoice>,
    pub archived: Vec<&'a Invoice>,
}

/// Owns the invoice list. Serialized transparently as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceBook {
    invoices: Vec<Invoice>,
}

impl InvoiceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    pub fn get(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    /// Create an invoice and apply its one-time side effects.
    ///
    /// Validation runs to completion before any ledger is touched, so a
    /// rejected draft leaves no partial mutation. On success: stock is
    /// decremented once per item, a Paid invoice records exactly one income
    /// transaction for the full total, and the invoice is appended.
    pub fn create(
        &mut self,
        draft: InvoiceDraft,
        catalog: &mut Catalog,
        book: &mut TransactionBook,
        now: DateTime<Utc>,
    ) -> DomainResult<InvoiceId> {
        if draft.customer_name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if draft.items.is_empty() {
            return Err(DomainError::validation("invoice must have at least one item"));
        }
        for item in &draft.items {
            if item.quantity <= 0 {
                return Err(DomainError::validation("item quantity must be positive"));
            }
            if item.price_at_purchase <= 0 {
                return Err(DomainError::validation("item price must be positive"));
            }
            let product = catalog
                .get(item.product_id)
                .ok_or_else(|| DomainError::validation("item references an unknown product"))?;
            if product.stock < item.quantity {
                return Err(DomainError::validation(format!(
                    "insufficient stock for {}",
                    product.name
                )));
            }
        }

        let id = InvoiceId::new();
        let invoice = Invoice {
            id,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            items: draft.items,
            date: draft.date,
            status: draft.status,
            last_modified: None,
        };

        for item in &invoice.items {
            catalog.decrement_stock(item.product_id, item.quantity)?;
        }

        if invoice.status == InvoiceStatus::Paid {
            book.record(
                &format!("Invoice {id} sale to {}", invoice.customer_name),
                invoice.total(),
                TransactionKind::Income,
                now.date_naive(),
            )?;
        }

        tracing::info!(invoice_id = %id, total = invoice.total(), status = ?invoice.status, "invoice created");
        self.invoices.push(invoice);
        Ok(id)
    }

    /// Direct one-unit sale shortcut: a single-item, immediately Paid invoice
    /// at the product's current price, routed through `create`.
    pub fn sell_product(
        &mut self,
        product_id: ProductId,
        customer_name: &str,
        customer_phone: &str,
        catalog: &mut Catalog,
        book: &mut TransactionBook,
        now: DateTime<Utc>,
    ) -> DomainResult<InvoiceId> {
        let product = catalog.get(product_id).ok_or(DomainError::NotFound)?;
        let draft = InvoiceDraft {
            customer_name: customer_name.to_string(),
            customer_phone: customer_phone.to_string(),
            items: vec![InvoiceItem {
                product_id,
                quantity: 1,
                price_at_purchase: product.price,
            }],
            date: now.date_naive(),
            status: InvoiceStatus::Paid,
        };
        self.create(draft, catalog, book, now)
    }

    /// Replace an invoice by id, stamping `last_modified`.
    ///
    /// Edits never re-adjust stock or touch the linked transaction: those
    /// effects are creation-time only, preserving the historical record.
    pub fn update(&mut self, mut updated: Invoice, now: DateTime<Utc>) -> DomainResult<()> {
        let slot = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == updated.id)
            .ok_or(DomainError::NotFound)?;
        updated.last_modified = Some(now);
        *slot = updated;
        Ok(())
    }

    /// Confirmation-gated removal. Does not reverse the creation-time stock
    /// decrement or delete the linked transaction.
    pub fn remove(&mut self, id: InvoiceId, confirmation: Confirmation) -> DomainResult<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let before = self.invoices.len();
        self.invoices.retain(|inv| inv.id != id);
        if self.invoices.len() == before {
            return Err(DomainError::NotFound);
        }
        tracing::info!(invoice_id = %id, "invoice deleted");
        Ok(true)
    }

    /// Explicit overdue marking; a paid invoice can no longer go overdue.
    pub fn mark_overdue(&mut self, id: InvoiceId, now: DateTime<Utc>) -> DomainResult<()> {
        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or(DomainError::NotFound)?;
        if invoice.status == InvoiceStatus::Paid {
            return Err(DomainError::invariant(
                "a paid invoice cannot be marked overdue",
            ));
        }
        invoice.status = InvoiceStatus::Overdue;
        invoice.last_modified = Some(now);
        Ok(())
    }

    /// Rewrite the customer name on one invoice (identity merge support).
    pub fn rename_customer(
        &mut self,
        id: InvoiceId,
        canonical: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == id)
            .ok_or(DomainError::NotFound)?;
        invoice.customer_name = canonical.to_string();
        invoice.last_modified = Some(now);
        Ok(())
    }

    /// Split invoices into recent (dated within the last `ARCHIVE_AFTER_DAYS`
    /// days) and archived.
    pub fn partition_by_recency(&self, today: NaiveDate) -> RecencyPartition<'_> {
        let cutoff = today - Duration::days(ARCHIVE_AFTER_DAYS);
        let mut partition = RecencyPartition::default();
        for invoice in &self.invoices {
            if invoice.date >= cutoff {
                partition.recent.push(invoice);
            } else {
                partition.archived.push(invoice);
            }
        }
        partition
    }

    /// Case-insensitive lookup over customer name and invoice id.
    pub fn find(&self, query: &str) -> Vec<&Invoice> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.invoices
            .iter()
            .filter(|inv| {
                inv.customer_name.to_lowercase().contains(&term)
                    || inv.id.to_string().contains(&term)
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.invoices.clear();
    }
}
