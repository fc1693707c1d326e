use crate::{
    db::DbPool,
    entities::{
        product::{self, Column as ProductColumn, Entity as ProductEntity},
        sale::{Column as SaleColumn, Entity as SaleEntity},
    },
    errors::ServiceError,
    models::{CategoryFilter, Product, ProductFilter, ProductInput, StockFilter},
};
use chrono::Utc;
use metrics::counter;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Product catalogue backed by the `products` table
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists products in creation order, narrowed by `filter`.
    ///
    /// Category and stock predicates run in SQL; the name search is applied
    /// afterwards so that matching is case-insensitive on every backend.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = ProductEntity::find();

        if let CategoryFilter::Exact(category) = &filter.category {
            query = query.filter(ProductColumn::Category.eq(category.as_str()));
        }
        query = match filter.stock {
            StockFilter::All => query,
            StockFilter::Low => {
                query.filter(Expr::col(ProductColumn::Stock).lte(Expr::col(ProductColumn::MinStock)))
            }
            StockFilter::Out => query.filter(ProductColumn::Stock.eq(0)),
        };

        let models = query
            .order_by_asc(ProductColumn::CreatedAt)
            .order_by_asc(ProductColumn::Name)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list products: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(models
            .into_iter()
            .map(Product::from)
            .filter(|p| filter.matches(p))
            .collect())
    }

    /// Products at or below their reorder threshold
    pub async fn low_stock_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.list_products(&ProductFilter::default().stock(StockFilter::Low))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<Product, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .map(Product::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ServiceError> {
        input.validate()?;

        let now = Utc::now();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            category: Set(input.category.trim().to_string()),
            price: Set(input.price),
            stock: Set(input.stock),
            min_stock: Set(input.min_stock),
            supplier: Set(input.supplier.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        counter!("stockwise_products.created", 1);
        info!(product_id = %model.id, "Product created");
        Ok(model.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> Result<Product, ServiceError> {
        input.validate()?;

        let db = &*self.db_pool;
        let existing = ProductEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.category = Set(input.category.trim().to_string());
        active.price = Set(input.price);
        active.stock = Set(input.stock);
        active.min_stock = Set(input.min_stock);
        active.supplier = Set(input.supplier.trim().to_string());
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| {
            error!(product_id = %id, "Failed to update product: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = %id, "Product updated");
        Ok(updated.into())
    }

    /// Deletes a product together with its sales history.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = self.db_pool.begin().await?;

        SaleEntity::delete_many()
            .filter(SaleColumn::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let result = ProductEntity::delete_by_id(id).exec(&txn).await.map_err(|e| {
            error!(product_id = %id, "Failed to delete product: {}", e);
            ServiceError::DatabaseError(e)
        })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Product {} not found", id)));
        }
        txn.commit().await?;

        counter!("stockwise_products.deleted", 1);
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
