//! Hosted generative model integration.
//!
//! The query pipeline only depends on [`GenerativeModel`]; [`gemini::GeminiClient`]
//! is the production implementation and tests substitute their own.

pub mod context;
pub mod gemini;
pub mod prompt;
pub mod schema;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub use context::{BoundedContext, ContextBudget, OmittedRecords, QueryContext};
pub use gemini::GeminiClient;
pub use prompt::build_prompt;
pub use schema::{response_schema, AnswerTopic, QueryAnswer};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Generative AI API key is not configured")]
    MissingApiKey,

    #[error("Model request failed: {0}")]
    Transport(String),

    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Model returned no content: {0}")]
    EmptyResponse(String),

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Model output does not match the answer schema: {0}")]
    SchemaMismatch(String),
}

/// A model able to produce a JSON object conforming to a response schema.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Identifier of the underlying model, used for logging.
    fn model_name(&self) -> &str;

    async fn generate_object(&self, prompt: &str, schema: &Value) -> Result<Value, ModelError>;
}
