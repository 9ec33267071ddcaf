//! `mizan-store` — best-effort key-value persistence.
//!
//! Every piece of console state lives under one well-known key as a JSON
//! document, read once at startup and rewritten on change. Reads that fail or
//! don't parse fall back to a documented default; writes are fire-and-forget.

pub mod kv;
pub mod memory;

pub use kv::{load_or_default, persist, StateStore, StorageKey, StoreError};
pub use memory::MemoryStore;
