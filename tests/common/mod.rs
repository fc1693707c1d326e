#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use stockwise_api::{
    ai::{GenerativeModel, ModelError},
    config::AppConfig,
    db,
    handlers::AppServices,
    models::{Product, ProductInput},
    AppState,
};
use tower::ServiceExt;

type Responder = dyn Fn(&str) -> Result<Value, ModelError> + Send + Sync;

/// Model double that records prompts and answers with a canned reply.
pub struct StubModel {
    responder: Box<Responder>,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(value: Value) -> Self {
        Self::with(move |_| Ok(value.clone()))
    }

    pub fn failing(make_error: impl Fn() -> ModelError + Send + Sync + 'static) -> Self {
        Self::with(move |_| Err(make_error()))
    }

    pub fn with(
        responder: impl Fn(&str) -> Result<Value, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn generate_object(&self, prompt: &str, _schema: &Value) -> Result<Value, ModelError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        (self.responder)(prompt)
    }
}

pub fn sample_answer() -> Value {
    json!({
        "Topic": {
            "Heading": "Reorder soon",
            "Description": "Two products are at or below their minimum stock.",
            "SqlQuery": ["SELECT name FROM products WHERE stock <= min_stock;"]
        }
    })
}

/// Helper harness for an application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_model(Arc::new(StubModel::replying(sample_answer()))).await
    }

    pub async fn with_model(model: Arc<dyn GenerativeModel>) -> Self {
        Self::with_config(test_config(), model).await
    }

    pub async fn with_config(cfg: AppConfig, model: Arc<dyn GenerativeModel>) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let services = AppServices::new(db.clone(), model, &cfg.ai);
        let state = AppState {
            db,
            config: cfg,
            services,
        };

        Self {
            router: stockwise_api::build_router(state.clone()),
            state,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    /// Posts a raw, possibly malformed, JSON body.
    pub async fn post_raw(&self, uri: &str, raw: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn seed_product(
        &self,
        name: &str,
        category: &str,
        price: Decimal,
        stock: i32,
        min_stock: i32,
    ) -> Product {
        self.state
            .services
            .products
            .create_product(ProductInput {
                name: name.to_string(),
                category: category.to_string(),
                price,
                stock,
                min_stock,
                supplier: "Acme".to_string(),
            })
            .await
            .expect("failed to seed product")
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
