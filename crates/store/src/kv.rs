//! Storage contract and typed load/persist helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Well-known persistence keys. String values match what earlier console
/// versions wrote, so existing state loads unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    UserEmail,
    IsPro,
    TrialStartDate,
    HasRegistered,
    Products,
    Transactions,
    Invoices,
    Employees,
    Notifications,
    InvoiceSettings,
    Language,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::UserEmail => "userEmail",
            StorageKey::IsPro => "isPro",
            StorageKey::TrialStartDate => "trialStartDate",
            StorageKey::HasRegistered => "hasRegistered",
            StorageKey::Products => "products",
            StorageKey::Transactions => "transactions",
            StorageKey::Invoices => "invoices",
            StorageKey::Employees => "employees",
            StorageKey::Notifications => "notifications",
            StorageKey::InvoiceSettings => "invoiceSettings",
            StorageKey::Language => "language",
        }
    }
}

impl core::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("read failed for '{key}': {reason}")]
    Read { key: &'static str, reason: String },

    #[error("write failed for '{key}': {reason}")]
    Write { key: &'static str, reason: String },
}

/// Raw JSON-document storage.
pub trait StateStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: StorageKey, value: &str) -> Result<(), StoreError>;
}

/// Read and decode one key. Missing, unreadable or unparsable state degrades
/// to the type's default; the failure is logged, never propagated.
pub fn load_or_default<T>(store: &dyn StateStore, key: StorageKey) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "storage read failed, using default");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "stored state did not parse, using default");
            T::default()
        }
    }
}

/// Encode and write one key. Best-effort: failures are logged and not
/// surfaced, per the persistence contract.
pub fn persist<T>(store: &mut dyn StateStore, key: StorageKey, value: &T)
where
    T: Serialize,
{
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "state failed to serialize, skipping write");
            return;
        }
    };
    if let Err(e) = store.write(key, &raw) {
        tracing::warn!(key = %key, error = %e, "storage write failed");
    }
}
