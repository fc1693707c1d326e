use crate::{
    errors::ErrorResponse,
    handlers::AppState,
    models::{DashboardStats, Product, TopProduct},
    ApiResponse, ApiResult,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

const MAX_TOP_PRODUCTS: usize = 100;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TopProductsParams {
    /// Number of products to return (1-100); defaults to the configured limit
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard headline numbers", body = ApiResponse<DashboardStats>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = state.services.analytics.dashboard_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// Best-selling products by revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/top-products",
    params(TopProductsParams),
    responses(
        (status = 200, description = "Products ranked by revenue", body = ApiResponse<Vec<TopProduct>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn top_products(
    State(state): State<AppState>,
    Query(params): Query<TopProductsParams>,
) -> ApiResult<Vec<TopProduct>> {
    let limit = params
        .limit
        .unwrap_or(state.config.ai.top_products_limit)
        .clamp(1, MAX_TOP_PRODUCTS);
    let ranked = state.services.analytics.top_products(limit).await?;
    Ok(Json(ApiResponse::success(ranked)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/low-stock",
    responses(
        (status = 200, description = "Products at or below their minimum stock", body = ApiResponse<Vec<Product>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn low_stock(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state.services.analytics.low_stock_products().await?;
    Ok(Json(ApiResponse::success(products)))
}
