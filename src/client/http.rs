use super::{inventory_list::ProductGateway, ClientError};
use crate::{
    errors::ErrorResponse,
    models::{
        CategoryFilter, DashboardStats, Product, ProductFilter, ProductInput, StockFilter,
        TopProduct,
    },
    services::AiQueryOutcome,
    ApiResponse,
};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Thin typed wrapper over the Stockwise HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request`, turning non-2xx responses into [`ClientError::Server`].
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "API returned an error");
        Err(match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => ClientError::Server {
                status: status.as_u16(),
                error: err.error,
                details: err.details.or(Some(err.message)).filter(|d| !d.is_empty()),
            },
            Err(_) => ClientError::Server {
                status: status.as_u16(),
                error: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                details: Some(body).filter(|b| !b.trim().is_empty()),
            },
        })
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Unwraps the `data` field of a success envelope.
    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let envelope: ApiResponse<T> = self.json(request).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("response envelope has no data".into()))
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if !filter.search.trim().is_empty() {
            params.push(("search", filter.search.trim().to_string()));
        }
        if let CategoryFilter::Exact(category) = &filter.category {
            params.push(("category", category.clone()));
        }
        if filter.stock != StockFilter::All {
            params.push(("stock", filter.stock.to_string()));
        }

        self.data(self.http.get(self.url("/api/products")).query(&params))
            .await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, ClientError> {
        self.data(self.http.get(self.url(&format!("/api/products/{}", id))))
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.data(self.http.get(self.url("/api/dashboard/stats")))
            .await
    }

    pub async fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, ClientError> {
        self.data(
            self.http
                .get(self.url("/api/dashboard/top-products"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn low_stock(&self) -> Result<Vec<Product>, ClientError> {
        self.data(self.http.get(self.url("/api/dashboard/low-stock")))
            .await
    }

    /// Posts a question to the analysis endpoint. The answer is returned as
    /// sent; callers validate it.
    pub async fn ask(&self, query: &str) -> Result<AiQueryOutcome, ClientError> {
        self.json(
            self.http
                .post(self.url("/api/ai"))
                .json(&json!({ "query": query })),
        )
        .await
    }
}

#[async_trait]
impl ProductGateway for ApiClient {
    async fn create_product(&self, input: &ProductInput) -> Result<Product, ClientError> {
        self.data(self.http.post(self.url("/api/products")).json(input))
            .await
    }

    async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Product, ClientError> {
        self.data(
            self.http
                .put(self.url(&format!("/api/products/{}", id)))
                .json(input),
        )
        .await
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/api/products/{}", id))))
            .await?;
        Ok(())
    }
}
