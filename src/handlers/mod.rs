pub mod ai;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod sales;

use crate::ai::{ContextBudget, GenerativeModel};
use crate::config::AiConfig;
use crate::db::DbPool;
use crate::services::{
    AiQueryService, AnalyticsService, DatabaseDataSource, ProductService, SalesService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub sales: Arc<SalesService>,
    pub analytics: Arc<AnalyticsService>,
    pub ai_query: Arc<AiQueryService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, model: Arc<dyn GenerativeModel>, ai: &AiConfig) -> Self {
        let products = Arc::new(ProductService::new(db_pool.clone()));
        let sales = Arc::new(SalesService::new(db_pool));
        let analytics = Arc::new(AnalyticsService::new(products.clone(), sales.clone()));

        let data_source = Arc::new(DatabaseDataSource::new(
            products.clone(),
            sales.clone(),
            analytics.clone(),
        ));
        let ai_query = Arc::new(AiQueryService::new(
            data_source,
            model,
            ContextBudget::from(ai),
            ai.top_products_limit,
        ));

        Self {
            products,
            sales,
            analytics,
            ai_query,
        }
    }
}
