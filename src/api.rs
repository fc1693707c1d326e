use crate::{config::AppConfig, handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing::{info, warn};

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    let products = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let sales = Router::new().route(
        "/",
        get(handlers::sales::list_sales).post(handlers::sales::record_sale),
    );

    let dashboard = Router::new()
        .route("/stats", get(handlers::dashboard::dashboard_stats))
        .route("/top-products", get(handlers::dashboard::top_products))
        .route("/low-stock", get(handlers::dashboard::low_stock));

    Router::new()
        .route("/ai", post(handlers::ai::ai_query))
        .nest("/products", products)
        .nest("/sales", sales)
        .nest("/dashboard", dashboard)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::liveness_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// CORS policy from configuration: explicit origins win, then the
/// permissive development fallback, otherwise cross-origin requests are
/// not allowed.
pub fn cors_layer(cfg: &AppConfig) -> CorsLayer {
    let configured_origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !configured_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(configured_origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        warn!("No CORS origins configured; cross-origin requests will be rejected");
        CorsLayer::new()
    }
}

/// Full application router with middleware applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let max_body_size = state.config.max_body_size;

    Router::<AppState>::new()
        .route("/", get(|| async { "stockwise-api up" }))
        .nest("/health", health_routes())
        .nest("/api", api_routes())
        .merge(crate::openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(max_body_size))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            crate::middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
