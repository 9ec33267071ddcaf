//! Narrow interface to the generative-AI service.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A single analysis request: a text prompt, optionally constrained to a
/// structured output schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub schema: Option<JsonValue>,
}

impl AnalysisRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            prompt: prompt.into(),
            schema: Some(schema),
        }
    }
}

/// What the service produced: free text, or JSON matching the requested
/// schema. Consumers must not trust the shape and parse defensively.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResponse {
    Text(String),
    Structured(JsonValue),
}

/// A failed call. One failure surfaces one user-visible error and aborts that
/// operation; there is no retry.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// The outbound call boundary. The only suspension point in the system.
#[async_trait]
pub trait InsightService: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, ServiceError>;
}
