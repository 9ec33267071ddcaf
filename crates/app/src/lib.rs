//! `mizan-app` — the root console: owns all state and the action surface.
//!
//! One `Console` value holds every ledger plus the account, mirrors each
//! mutation to the store, and regenerates derived notifications after invoice
//! or product changes. Entitlement gating and the free-tier product limit are
//! applied here, at the action boundary, never inside the ledgers.

pub mod console;
pub mod settings;

pub use console::{Console, DataCategory};
pub use settings::InvoiceSettings;
