//! Notification feed with idempotent keys and a newest-first merge policy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mizan_core::{InvoiceId, ProductId};
use mizan_inventory::Catalog;
use mizan_invoicing::{InvoiceBook, InvoiceStatus};

/// Deterministic notification key.
///
/// Rule-based keys are stable per source event (`overdue-<invoiceId>`,
/// `lowstock-<productId>`) so regeneration never duplicates a live entry.
/// Insight keys embed the generation timestamp and are therefore fresh on
/// every run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn overdue(invoice_id: InvoiceId) -> Self {
        Self(format!("overdue-{invoice_id}"))
    }

    pub fn low_stock(product_id: ProductId) -> Self {
        Self(format!("lowstock-{product_id}"))
    }

    pub fn insight(kind: &str, subject: &str, at: DateTime<Utc>) -> Self {
        Self(format!("{kind}-{subject}-{}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A derived alert. Ephemeral relative to the ledgers: regenerated and merged,
/// never edited beyond the `read` toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(id: NotificationId, title: impl Into<String>, message: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            message: message.into(),
            date,
            read: false,
        }
    }
}

/// The live notification list, newest first. Serialized transparently as a
/// plain array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn contains(&self, id: &NotificationId) -> bool {
        self.notifications.iter().any(|n| n.id == *id)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// Merge policy shared by every source: candidates whose key is already
    /// live are dropped, survivors are prepended (newest first). Returns how
    /// many entries were added.
    pub fn push(&mut self, candidates: Vec<Notification>) -> usize {
        let fresh: Vec<Notification> = candidates
            .into_iter()
            .filter(|c| !self.contains(&c.id))
            .collect();
        let added = fresh.len();
        if added > 0 {
            tracing::debug!(added, "notifications added");
            self.notifications.splice(0..0, fresh);
        }
        added
    }

    /// Regenerate rule-based alerts from the ledgers.
    ///
    /// - Overdue: unpaid invoices dated strictly before `today`.
    /// - Low stock: products with `0 < stock <= LOW_STOCK_THRESHOLD`.
    ///
    /// Running this again with no qualifying change is a no-op.
    pub fn refresh(
        &mut self,
        invoices: &InvoiceBook,
        catalog: &Catalog,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> usize {
        let mut candidates = Vec::new();

        for invoice in invoices.invoices() {
            if invoice.status == InvoiceStatus::Unpaid && invoice.date < today {
                candidates.push(Notification::new(
                    NotificationId::overdue(invoice.id),
                    "Overdue invoice",
                    format!(
                        "Invoice {} for {} is past its due date",
                        invoice.id, invoice.customer_name
                    ),
                    now,
                ));
            }
        }

        for product in catalog.low_stock() {
            candidates.push(Notification::new(
                NotificationId::low_stock(product.id),
                "Low stock",
                format!("{} is down to {} unit(s)", product.name, product.stock),
                now,
            ));
        }

        self.push(candidates)
    }

    /// Toggle one entry read. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: &NotificationId) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == *id) {
            notification.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mizan_accounting::TransactionBook;
    use mizan_invoicing::{InvoiceDraft, InvoiceItem};

    fn now() -> DateTime<Utc> {
        "2026-02-10T12:00:00Z".parse().expect("fixed timestamp")
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn ledgers_with_overdue_invoice() -> (InvoiceBook, Catalog) {
        let mut invoices = InvoiceBook::new();
        let mut catalog = Catalog::new();
        let mut transactions = TransactionBook::new();
        let product = catalog.add("Widget", 1000, 10).unwrap();
        invoices
            .create(
                InvoiceDraft {
                    customer_name: "Alice".to_string(),
                    customer_phone: String::new(),
                    items: vec![InvoiceItem {
                        product_id: product,
                        quantity: 1,
                        price_at_purchase: 1000,
                    }],
                    date: today().pred_opt().expect("yesterday"),
                    status: InvoiceStatus::Unpaid,
                },
                &mut catalog,
                &mut transactions,
                now(),
            )
            .unwrap();
        (invoices, catalog)
    }

    #[test]
    fn unpaid_invoice_dated_yesterday_triggers_overdue_alert() {
        let (invoices, catalog) = ledgers_with_overdue_invoice();
        let mut feed = NotificationFeed::new();
        let added = feed.refresh(&invoices, &catalog, today(), now());
        assert_eq!(added, 1);
        let id = NotificationId::overdue(invoices.invoices()[0].id);
        assert!(feed.contains(&id));
    }

    #[test]
    fn refresh_is_idempotent_for_unchanged_ledgers() {
        let (invoices, catalog) = ledgers_with_overdue_invoice();
        let mut feed = NotificationFeed::new();
        feed.refresh(&invoices, &catalog, today(), now());
        let snapshot = feed.notifications().to_vec();

        let added = feed.refresh(&invoices, &catalog, today(), now());
        assert_eq!(added, 0);
        assert_eq!(feed.notifications(), snapshot.as_slice());
    }

    #[test]
    fn low_stock_alert_appears_exactly_once() {
        let mut catalog = Catalog::new();
        let product = catalog.add("Widget", 1000, 3).unwrap();
        let invoices = InvoiceBook::new();

        let mut feed = NotificationFeed::new();
        assert_eq!(feed.refresh(&invoices, &catalog, today(), now()), 1);
        assert_eq!(feed.refresh(&invoices, &catalog, today(), now()), 0);
        assert_eq!(feed.len(), 1);
        assert!(feed.contains(&NotificationId::low_stock(product)));
    }

    #[test]
    fn paid_invoice_stops_future_candidates_but_keeps_old_alert() {
        let (mut invoices, catalog) = ledgers_with_overdue_invoice();
        let mut feed = NotificationFeed::new();
        feed.refresh(&invoices, &catalog, today(), now());
        assert_eq!(feed.len(), 1);

        let mut paid = invoices.invoices()[0].clone();
        paid.status = InvoiceStatus::Paid;
        invoices.update(paid, now()).unwrap();

        // No new candidate, and the already-emitted alert is not revoked.
        assert_eq!(feed.refresh(&invoices, &catalog, today(), now()), 0);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn newer_entries_are_prepended() {
        let mut feed = NotificationFeed::new();
        feed.push(vec![Notification::new(
            NotificationId::insight("LARGE_EXPENSE", "rent", now()),
            "Large expense",
            "Rent jumped",
            now(),
        )]);
        let later = now() + chrono::Duration::seconds(5);
        feed.push(vec![Notification::new(
            NotificationId::insight("LARGE_EXPENSE", "rent", later),
            "Large expense",
            "Rent jumped again",
            later,
        )]);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.notifications()[0].date, later);
    }

    #[test]
    fn read_toggles_never_remove_entries() {
        let mut feed = NotificationFeed::new();
        let id = NotificationId::insight("REPEAT_CUSTOMER", "alice", now());
        feed.push(vec![Notification::new(
            id.clone(),
            "Returning customer",
            "Alice keeps coming back",
            now(),
        )]);

        feed.mark_read(&id);
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.len(), 1);

        feed.mark_all_read();
        assert_eq!(feed.len(), 1);
    }
}
