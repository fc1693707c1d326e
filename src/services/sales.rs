use crate::{
    db::DbPool,
    entities::{
        product::{Column as ProductColumn, Entity as ProductEntity},
        sale::{self, Column as SaleColumn, Entity as SaleEntity},
    },
    errors::ServiceError,
    models::{NewSale, Sale},
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Sales ledger backed by the `sales` table
#[derive(Clone)]
pub struct SalesService {
    db_pool: Arc<DbPool>,
}

impl SalesService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// All sales, newest first
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<Sale>, ServiceError> {
        let sales = SaleEntity::find()
            .order_by_desc(SaleColumn::SoldAt)
            .all(&*self.db_pool)
            .await?;
        Ok(sales.into_iter().map(Sale::from).collect())
    }

    /// Records a sale and decrements the product's stock in one transaction.
    ///
    /// The decrement is conditional on `stock >= quantity`, so concurrent
    /// sales can never drive stock negative.
    #[instrument(skip(self, input), fields(product_id = %input.product_id, quantity = input.quantity))]
    pub async fn record_sale(&self, input: NewSale) -> Result<Sale, ServiceError> {
        input.validate()?;

        let txn = self.db_pool.begin().await?;

        let product = ProductEntity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let unit_price = input.unit_price.unwrap_or(product.price);
        if unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit price cannot be negative".to_string(),
            ));
        }

        let total_amount = unit_price
            .checked_mul(Decimal::from(input.quantity))
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Sale total overflows: {} x {}",
                    unit_price, input.quantity
                ))
            })?;

        let decremented = ProductEntity::update_many()
            .col_expr(
                ProductColumn::Stock,
                Expr::col(ProductColumn::Stock).sub(input.quantity),
            )
            .col_expr(ProductColumn::UpdatedAt, Expr::value(Utc::now()))
            .filter(ProductColumn::Id.eq(input.product_id))
            .filter(ProductColumn::Stock.gte(input.quantity))
            .exec(&txn)
            .await?;

        if decremented.rows_affected == 0 {
            warn!(
                available = product.stock,
                requested = input.quantity,
                "Sale rejected for insufficient stock"
            );
            counter!("stockwise_sales.rejected", 1);
            return Err(ServiceError::InsufficientStock(format!(
                "{} has {} units, {} requested",
                product.name, product.stock, input.quantity
            )));
        }

        let sale = sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            unit_price: Set(unit_price),
            total_amount: Set(total_amount),
            sold_at: Set(input.sold_at.unwrap_or_else(Utc::now)),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        counter!("stockwise_sales.recorded", 1);
        info!(sale_id = %sale.id, total = %sale.total_amount, "Sale recorded");
        Ok(sale.into())
    }
}
