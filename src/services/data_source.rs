use crate::{
    errors::ServiceError,
    models::{DashboardStats, Product, ProductFilter, Sale, TopProduct},
};
use async_trait::async_trait;
use std::sync::Arc;

use super::{analytics::AnalyticsService, products::ProductService, sales::SalesService};

/// Read-only view of the inventory consumed by the query pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryDataSource: Send + Sync {
    async fn products(&self) -> Result<Vec<Product>, ServiceError>;
    async fn sales(&self) -> Result<Vec<Sale>, ServiceError>;
    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError>;
    async fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, ServiceError>;
    async fn low_stock_products(&self) -> Result<Vec<Product>, ServiceError>;
}

#[derive(Clone)]
pub struct DatabaseDataSource {
    products: Arc<ProductService>,
    sales: Arc<SalesService>,
    analytics: Arc<AnalyticsService>,
}

impl DatabaseDataSource {
    pub fn new(
        products: Arc<ProductService>,
        sales: Arc<SalesService>,
        analytics: Arc<AnalyticsService>,
    ) -> Self {
        Self {
            products,
            sales,
            analytics,
        }
    }
}

#[async_trait]
impl InventoryDataSource for DatabaseDataSource {
    async fn products(&self) -> Result<Vec<Product>, ServiceError> {
        self.products.list_products(&ProductFilter::default()).await
    }

    async fn sales(&self) -> Result<Vec<Sale>, ServiceError> {
        self.sales.list_sales().await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        self.analytics.dashboard_stats().await
    }

    async fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, ServiceError> {
        self.analytics.top_products(limit).await
    }

    async fn low_stock_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.analytics.low_stock_products().await
    }
}
