use super::{ApiClient, ClientError};
use crate::ai::{QueryAnswer, QueryContext};
use tracing::{info, instrument};
use validator::Validate;

/// A validated answer and its markdown rendering
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub answer: QueryAnswer,
    pub data: QueryContext,
    pub rendered: String,
}

/// Free-text question box backed by the analysis endpoint
#[derive(Debug, Clone)]
pub struct QueryClient {
    api: ApiClient,
    input: String,
}

impl QueryClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            input: String::new(),
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Posts the current input. Blank input is rejected without a request.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<QueryResult, ClientError> {
        let query = self.input.trim();
        if query.is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        let outcome = self.api.ask(query).await?;
        outcome
            .response
            .validate()
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        info!(heading = %outcome.response.topic.heading, "Received analysis");
        Ok(QueryResult {
            rendered: outcome.response.to_markdown(),
            answer: outcome.response,
            data: outcome.data,
        })
    }
}
