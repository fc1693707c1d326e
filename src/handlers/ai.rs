use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::AiQueryOutcome,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AiQueryRequest {
    /// Free-text question about the inventory
    #[serde(default)]
    #[schema(example = "Which products should I reorder this week?")]
    pub query: Option<String>,
}

/// Answer a natural-language question about the inventory
#[utoipa::path(
    post,
    path = "/api/ai",
    request_body = AiQueryRequest,
    responses(
        (status = 200, description = "Analysis generated", body = AiQueryOutcome,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 400, description = "Missing or empty query", body = ErrorResponse),
        (status = 500, description = "Data fetch or model failure", body = ErrorResponse)
    ),
    tag = "ai"
)]
pub async fn ai_query(
    State(state): State<AppState>,
    payload: Result<Json<AiQueryRequest>, JsonRejection>,
) -> Result<Json<AiQueryOutcome>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected AI query body: {}", rejection.body_text());
            return Err(ApiError::detailed(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                rejection.body_text(),
            ));
        }
    };

    let query = request.query.unwrap_or_default();
    let outcome = state.services.ai_query.answer(&query).await?;
    Ok(Json(outcome))
}
