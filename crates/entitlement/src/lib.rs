//! `mizan-entitlement` — account tier evaluation and feature gating.
//!
//! Computes the {free, trial, pro, owner} tier from stored account flags and
//! elapsed trial time. Gating is advisory: it decides what is reachable at the
//! UI boundary and never blocks data-layer operations.

pub mod account;

pub use account::{Access, Account, OwnerRegistry, Tier, TRIAL_DURATION_DAYS};
