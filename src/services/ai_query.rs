use crate::{
    ai::{
        build_prompt, response_schema, ContextBudget, GenerativeModel, ModelError, QueryAnswer,
        QueryContext,
    },
    errors::{ApiError, ServiceError},
};
use axum::http::StatusCode;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::data_source::InventoryDataSource;

/// Successful answer together with the snapshot the model was given
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiQueryOutcome {
    pub response: QueryAnswer,
    pub data: QueryContext,
}

#[derive(Debug, thiserror::Error)]
pub enum AiQueryError {
    #[error("Query is required")]
    EmptyQuery,

    #[error("{0}")]
    DataFetch(ServiceError),

    #[error("{0}")]
    Model(#[from] ModelError),
}

impl From<AiQueryError> for ApiError {
    fn from(err: AiQueryError) -> Self {
        match err {
            AiQueryError::EmptyQuery => ApiError::detailed(
                StatusCode::BAD_REQUEST,
                "Invalid request",
                "Query is required",
            ),
            AiQueryError::DataFetch(e) => ApiError::detailed(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process request",
                e.to_string(),
            ),
            AiQueryError::Model(e) => ApiError::detailed(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate analysis",
                e.to_string(),
            ),
        }
    }
}

/// Answers natural-language questions about the inventory using a
/// generative model.
#[derive(Clone)]
pub struct AiQueryService {
    data: Arc<dyn InventoryDataSource>,
    model: Arc<dyn GenerativeModel>,
    budget: ContextBudget,
    top_products_limit: usize,
}

impl AiQueryService {
    pub fn new(
        data: Arc<dyn InventoryDataSource>,
        model: Arc<dyn GenerativeModel>,
        budget: ContextBudget,
        top_products_limit: usize,
    ) -> Self {
        Self {
            data,
            model,
            budget,
            top_products_limit,
        }
    }

    /// Fetches every section of the snapshot concurrently.
    pub async fn gather_context(&self) -> Result<QueryContext, ServiceError> {
        let (products, sales, stats, top_products, low_stock) = tokio::try_join!(
            self.data.products(),
            self.data.sales(),
            self.data.dashboard_stats(),
            self.data.top_products(self.top_products_limit),
            self.data.low_stock_products(),
        )?;

        Ok(QueryContext {
            products,
            sales,
            stats,
            top_products,
            low_stock,
        })
    }

    #[instrument(skip(self, query), fields(model = %self.model.model_name(), query_chars = query.len()))]
    pub async fn answer(&self, query: &str) -> Result<AiQueryOutcome, AiQueryError> {
        let query = query.trim();
        if query.is_empty() {
            counter!("stockwise_ai.queries.rejected", 1);
            return Err(AiQueryError::EmptyQuery);
        }

        let context = self.gather_context().await.map_err(|e| {
            error!("Failed to gather inventory data: {}", e);
            counter!("stockwise_ai.queries.failed", 1);
            AiQueryError::DataFetch(e)
        })?;

        let bounded = context
            .bound(&self.budget)
            .map_err(|e| AiQueryError::DataFetch(e.into()))?;
        if !bounded.omitted.is_empty() {
            warn!(
                omitted_products = bounded.omitted.products,
                omitted_sales = bounded.omitted.sales,
                omitted_low_stock = bounded.omitted.low_stock,
                omitted_top_products = bounded.omitted.top_products,
                "Inventory snapshot truncated to fit the model context budget"
            );
        }

        let prompt = build_prompt(&bounded.serialized, query, &bounded.omitted);

        info!("Generating analysis");
        let started = Instant::now();
        let answer = self.generate(&prompt).await.map_err(|e| {
            error!(elapsed = ?started.elapsed(), "Analysis generation failed: {}", e);
            counter!("stockwise_ai.queries.failed", 1);
            AiQueryError::Model(e)
        })?;

        counter!("stockwise_ai.queries.succeeded", 1);
        info!(elapsed = ?started.elapsed(), heading = %answer.topic.heading, "Analysis generated");

        Ok(AiQueryOutcome {
            response: answer,
            data: bounded.context,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<QueryAnswer, ModelError> {
        let raw = self
            .model
            .generate_object(prompt, &response_schema())
            .await?;
        let answer: QueryAnswer =
            serde_json::from_value(raw).map_err(|e| ModelError::SchemaMismatch(e.to_string()))?;
        answer
            .validate()
            .map_err(|e| ModelError::SchemaMismatch(e.to_string()))?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockGenerativeModel;
    use crate::models::{DashboardStats, Product};
    use crate::services::data_source::MockInventoryDataSource;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use uuid::Uuid;

    fn widget() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Widget".into(),
            category: "Hardware".into(),
            price: dec!(4.00),
            stock: 1,
            min_stock: 5,
            supplier: "Acme".into(),
        }
    }

    fn healthy_data() -> MockInventoryDataSource {
        let mut data = MockInventoryDataSource::new();
        data.expect_products().returning(|| Ok(vec![widget()]));
        data.expect_sales().returning(|| Ok(vec![]));
        data.expect_dashboard_stats()
            .returning(|| Ok(DashboardStats::default()));
        data.expect_top_products().returning(|_| Ok(vec![]));
        data.expect_low_stock_products()
            .returning(|| Ok(vec![widget()]));
        data
    }

    fn model_returning(value: serde_json::Value) -> MockGenerativeModel {
        let mut model = MockGenerativeModel::new();
        model.expect_model_name().return_const("mock".to_string());
        model
            .expect_generate_object()
            .returning(move |_, _| Ok(value.clone()));
        model
    }

    fn service(data: MockInventoryDataSource, model: MockGenerativeModel) -> AiQueryService {
        AiQueryService::new(
            Arc::new(data),
            Arc::new(model),
            ContextBudget::default(),
            5,
        )
    }

    #[tokio::test]
    async fn answers_with_model_output_and_snapshot() {
        let svc = service(
            healthy_data(),
            model_returning(json!({
                "Topic": { "Heading": "Reorder", "Description": "Widget is low." }
            })),
        );

        let outcome = svc.answer("  what is low?  ").await.unwrap();
        assert_eq!(outcome.response.topic.heading, "Reorder");
        assert_eq!(outcome.data.low_stock.len(), 1);
        assert_eq!(outcome.data.products[0].name, "Widget");
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_work() {
        let mut model = MockGenerativeModel::new();
        model.expect_model_name().return_const("mock".to_string());
        model.expect_generate_object().never();
        let mut data = MockInventoryDataSource::new();
        data.expect_products().never();

        let err = service(data, model).answer(" \n\t").await.unwrap_err();
        assert_matches!(err, AiQueryError::EmptyQuery);
    }

    #[tokio::test]
    async fn data_failure_skips_the_model() {
        let mut data = MockInventoryDataSource::new();
        data.expect_products()
            .returning(|| Err(ServiceError::database_error_message("connection refused")));
        data.expect_sales().returning(|| Ok(vec![]));
        data.expect_dashboard_stats()
            .returning(|| Ok(DashboardStats::default()));
        data.expect_top_products().returning(|_| Ok(vec![]));
        data.expect_low_stock_products().returning(|| Ok(vec![]));

        let mut model = MockGenerativeModel::new();
        model.expect_model_name().return_const("mock".to_string());
        model.expect_generate_object().never();

        let err = service(data, model).answer("q").await.unwrap_err();
        assert_matches!(err, AiQueryError::DataFetch(_));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn model_failure_is_reported_as_model_error() {
        let mut model = MockGenerativeModel::new();
        model.expect_model_name().return_const("mock".to_string());
        model.expect_generate_object().returning(|_, _| {
            Err(ModelError::Upstream {
                status: 429,
                message: "quota exceeded".into(),
            })
        });

        let err = service(healthy_data(), model).answer("q").await.unwrap_err();
        assert_matches!(err, AiQueryError::Model(ModelError::Upstream { status: 429, .. }));
    }

    #[tokio::test]
    async fn schema_violating_output_is_a_model_error() {
        let svc = service(
            healthy_data(),
            model_returning(json!({ "Topic": { "Heading": "" , "Description": "x" } })),
        );
        let err = svc.answer("q").await.unwrap_err();
        assert_matches!(err, AiQueryError::Model(ModelError::SchemaMismatch(_)));

        let svc = service(healthy_data(), model_returning(json!({ "answer": 42 })));
        let err = svc.answer("q").await.unwrap_err();
        assert_matches!(err, AiQueryError::Model(ModelError::SchemaMismatch(_)));
    }

    #[test]
    fn errors_map_to_fixed_headlines() {
        let cases = [
            (AiQueryError::EmptyQuery, StatusCode::BAD_REQUEST, "Invalid request"),
            (
                AiQueryError::DataFetch(ServiceError::InternalError("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process request",
            ),
            (
                AiQueryError::Model(ModelError::MissingApiKey),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate analysis",
            ),
        ];

        for (err, expected_status, expected_headline) in cases {
            assert_matches!(
                ApiError::from(err),
                ApiError::Detailed { status, ref headline, .. }
                    if status == expected_status && headline == expected_headline
            );
        }
    }
}
