use crate::{
    errors::ServiceError,
    models::{distinct_categories, DashboardStats, Product, ProductFilter, Sale, TopProduct},
};
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};
use tracing::instrument;
use uuid::Uuid;

use super::{products::ProductService, sales::SalesService};

/// Dashboard aggregates computed from the product and sales tables
#[derive(Clone)]
pub struct AnalyticsService {
    products: Arc<ProductService>,
    sales: Arc<SalesService>,
}

impl AnalyticsService {
    pub fn new(products: Arc<ProductService>, sales: Arc<SalesService>) -> Self {
        Self { products, sales }
    }

    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let filter = ProductFilter::default();
        let (products, sales) = tokio::try_join!(
            self.products.list_products(&filter),
            self.sales.list_sales()
        )?;
        compute_dashboard_stats(&products, &sales)
    }

    #[instrument(skip(self))]
    pub async fn top_products(&self, limit: usize) -> Result<Vec<TopProduct>, ServiceError> {
        let filter = ProductFilter::default();
        let (products, sales) = tokio::try_join!(
            self.products.list_products(&filter),
            self.sales.list_sales()
        )?;
        rank_top_products(&products, &sales, limit)
    }

    pub async fn low_stock_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.products.low_stock_products().await
    }
}

/// Aggregates the dashboard numbers. Monetary totals that do not fit in a
/// `Decimal` are reported as an internal error.
pub fn compute_dashboard_stats(
    products: &[Product],
    sales: &[Sale],
) -> Result<DashboardStats, ServiceError> {
    let inventory_value = products.iter().try_fold(Decimal::ZERO, |total, p| {
        p.stock_value()
            .and_then(|value| total.checked_add(value))
            .ok_or_else(|| overflow("inventory value"))
    })?;
    let total_revenue = checked_total(sales.iter().map(|s| s.total_amount), "total revenue")?;

    Ok(DashboardStats {
        total_products: products.len() as u64,
        total_stock_units: products.iter().map(|p| i64::from(p.stock)).sum(),
        inventory_value,
        total_sales: sales.len() as u64,
        units_sold: sales.iter().map(|s| i64::from(s.quantity)).sum(),
        total_revenue,
        low_stock_count: products.iter().filter(|p| p.is_low_stock()).count() as u64,
        out_of_stock_count: products.iter().filter(|p| p.is_out_of_stock()).count() as u64,
        category_count: distinct_categories(products).len() as u64,
    })
}

fn checked_total(
    mut amounts: impl Iterator<Item = Decimal>,
    what: &str,
) -> Result<Decimal, ServiceError> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or_else(|| overflow(what))
    })
}

fn overflow(what: &str) -> ServiceError {
    ServiceError::InternalError(format!("{} overflowed", what))
}

/// Ranks products by revenue, then units sold, then name. Sales referring to
/// unknown products are ignored.
pub fn rank_top_products(
    products: &[Product],
    sales: &[Sale],
    limit: usize,
) -> Result<Vec<TopProduct>, ServiceError> {
    let mut totals: HashMap<Uuid, (i64, Decimal)> = HashMap::new();
    for sale in sales {
        let entry = totals.entry(sale.product_id).or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(sale.quantity);
        entry.1 = entry
            .1
            .checked_add(sale.total_amount)
            .ok_or_else(|| overflow("product revenue"))?;
    }

    let mut ranked: Vec<TopProduct> = products
        .iter()
        .filter_map(|p| {
            totals.get(&p.id).map(|(units, revenue)| TopProduct {
                product_id: p.id,
                name: p.name.clone(),
                category: p.category.clone(),
                units_sold: *units,
                revenue: *revenue,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| b.units_sold.cmp(&a.units_sold))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    Ok(ranked)
}
