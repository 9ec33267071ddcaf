//! Invoice records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mizan_core::{InvoiceId, ProductId};
use mizan_inventory::Catalog;

/// Invoice lifecycle status.
///
/// Serialized uppercase to match state written by earlier console versions.
/// There is no automatic `Unpaid -> Overdue` transition on a date passing;
/// that condition only surfaces as a notification. `Overdue` is set by an
/// explicit action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Overdue,
}

/// One invoice line. `price_at_purchase` is captured at sale time so later
/// catalog price changes never alter historical invoice totals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price_at_purchase: i64,
}

impl InvoiceItem {
    pub fn line_total(&self) -> i64 {
        self.quantity * self.price_at_purchase
    }

    /// Display name of the referenced product, tolerating a product deleted
    /// after the sale (the reference is weak by design).
    pub fn product_label(&self, catalog: &Catalog) -> String {
        catalog
            .get(self.product_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown product".to_string())
    }
}

/// A customer invoice.
///
/// Items weakly reference products by id; a product deleted later leaves a
/// dangling reference that display layers resolve to a fallback label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<InvoiceItem>,
    /// Due date.
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Invoice {
    /// The invoice total, used everywhere a total is displayed or turned into
    /// a transaction.
    pub fn total(&self) -> i64 {
        self.items.iter().map(InvoiceItem::line_total).sum()
    }
}

/// Input for creating an invoice; the engine assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<InvoiceItem>,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}
