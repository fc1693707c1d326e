mod common;

use axum::http::{Method, StatusCode};

use common::{response_json, test_config, StubModel, TestApp};

#[tokio::test]
async fn liveness_reports_model_configuration() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["ai_configured"], false);
}

#[tokio::test]
async fn liveness_reflects_configured_key() {
    let mut cfg = test_config();
    cfg.ai.api_key = Some("key".into());
    let app = TestApp::with_config(cfg, std::sync::Arc::new(StubModel::replying(
        common::sample_answer(),
    )))
    .await;

    let body = response_json(app.request(Method::GET, "/health", None).await).await;
    assert_eq!(body["ai_configured"], true);
}

#[tokio::test]
async fn readiness_checks_database() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["checks"]["database"]["status"], "up");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/products", None).await;
    assert!(response.headers().contains_key("x-request-id"));

    let body = response_json(response).await;
    assert!(body["meta"]["request_id"].is_string());
}
