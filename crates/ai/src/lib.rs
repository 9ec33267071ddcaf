//! `mizan-ai` — the boundary to the external generative-AI service.
//!
//! The service is an opaque collaborator: prompt in, domain-shaped response
//! or a single failure out. No retry, no backoff. This crate stays
//! storage-agnostic: callers provide the data context to analyze.

pub mod assistant;
pub mod service;

pub use assistant::{AnomalyScan, Assistant, InsightAction, RunOutcome};
pub use service::{AnalysisRequest, AnalysisResponse, InsightService, ServiceError};
