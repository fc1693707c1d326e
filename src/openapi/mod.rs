use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockwise API",
        version = "1.0.0",
        description = r#"
# Stockwise Inventory API

Inventory and sales dashboard backend.

## Features

- **Products**: Catalogue CRUD with name, category and stock-level filters
- **Sales**: Sales ledger with transactional stock decrement
- **Dashboard**: Headline stats, top sellers and low-stock alerts
- **AI analysis**: Ask questions about the inventory in plain language

## Error Handling

Failures return a consistent body:

```json
{
  "error": "Failed to generate analysis",
  "message": "Failed to generate analysis",
  "details": "Model API error (503): The model is overloaded.",
  "request_id": "0b6f3c1e-5d0a-4b8f-9a57-1f1f8d0c2a11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "ai", description = "Natural-language inventory analysis"),
        (name = "products", description = "Product catalogue endpoints"),
        (name = "sales", description = "Sales ledger endpoints"),
        (name = "dashboard", description = "Dashboard aggregates"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::ai::ai_query,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::sales::list_sales,
        crate::handlers::sales::record_sale,
        crate::handlers::dashboard::dashboard_stats,
        crate::handlers::dashboard::top_products,
        crate::handlers::dashboard::low_stock,
        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
    ),
    components(
        schemas(
            crate::handlers::ai::AiQueryRequest,
            crate::services::AiQueryOutcome,
            crate::ai::QueryAnswer,
            crate::ai::AnswerTopic,
            crate::ai::QueryContext,
            crate::models::Product,
            crate::models::ProductInput,
            crate::models::StockStatus,
            crate::models::StockFilter,
            crate::models::Sale,
            crate::models::NewSale,
            crate::models::DashboardStats,
            crate::models::TopProduct,
            crate::ResponseMeta,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
