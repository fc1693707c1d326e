use crate::{
    errors::{ErrorResponse, ServiceError},
    handlers::AppState,
    models::{NewSale, Sale},
    ApiResponse, ApiResult,
};
use axum::{extract::State, http::StatusCode, Json};

/// List recorded sales, newest first
#[utoipa::path(
    get,
    path = "/api/sales",
    responses(
        (status = 200, description = "Sales history", body = ApiResponse<Vec<Sale>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Vec<Sale>> {
    let sales = state.services.sales.list_sales().await?;
    Ok(Json(ApiResponse::success(sales)))
}

/// Record a sale and decrement stock
#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = NewSale,
    responses(
        (status = 201, description = "Sale recorded", body = ApiResponse<Sale>),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 422, description = "Insufficient stock", body = ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    Json(input): Json<NewSale>,
) -> Result<(StatusCode, Json<ApiResponse<Sale>>), ServiceError> {
    let sale = state.services.sales.record_sale(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(sale))))
}
