//! `mizan-parties` — customer identity resolution across invoices.
//!
//! The same real customer often appears under several spelling variants
//! (casing, stray whitespace). The resolver groups invoices by normalized
//! name and rewrites variants to a canonical spelling on demand.

pub mod resolver;

pub use resolver::{merge_duplicates, repeat_customers, MergeOutcome};
