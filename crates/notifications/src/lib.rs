//! `mizan-notifications` — transient alerts derived from the ledgers.
//!
//! Rule-based alerts (overdue invoices, low stock) are regenerated whenever
//! invoices or products change and deduplicated by stable keys. Alerts are
//! never revoked: a condition clearing up stops future candidates but leaves
//! already-emitted entries in the feed.

pub mod feed;

pub use feed::{Notification, NotificationFeed, NotificationId};
