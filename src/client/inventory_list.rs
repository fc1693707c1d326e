use super::ClientError;
use crate::models::{distinct_categories, Product, ProductFilter, ProductInput};
use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

/// Product mutations that go through the CRUD endpoints
#[derive(Debug, Clone, PartialEq)]
pub enum ProductCommand {
    Create(ProductInput),
    Update { id: Uuid, input: ProductInput },
    Delete(Uuid),
}

/// Backing store for product mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn create_product(&self, input: &ProductInput) -> Result<Product, ClientError>;
    async fn update_product(&self, id: Uuid, input: &ProductInput) -> Result<Product, ClientError>;
    async fn delete_product(&self, id: Uuid) -> Result<(), ClientError>;
}

/// Client-side product list with filtering.
///
/// Local state changes only after the gateway confirms a mutation; a failed
/// command leaves the list untouched.
#[derive(Debug, Clone, Default)]
pub struct InventoryList {
    products: Vec<Product>,
    filter: ProductFilter,
}

impl InventoryList {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            filter: ProductFilter::default(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in first-seen order, for filter options
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.products)
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ProductFilter) {
        self.filter = filter;
    }

    pub fn filtered(&self) -> Vec<&Product> {
        self.filter.apply(&self.products)
    }

    pub async fn execute<G>(&mut self, gateway: &G, command: ProductCommand) -> Result<(), ClientError>
    where
        G: ProductGateway + ?Sized,
    {
        let outcome = match &command {
            ProductCommand::Create(input) => gateway.create_product(input).await.map(|created| {
                self.products.push(created);
            }),
            ProductCommand::Update { id, input } => {
                gateway.update_product(*id, input).await.map(|updated| {
                    if let Some(existing) = self.products.iter_mut().find(|p| p.id == updated.id) {
                        *existing = updated;
                    }
                })
            }
            ProductCommand::Delete(id) => gateway.delete_product(*id).await.map(|()| {
                self.products.retain(|p| p.id != *id);
            }),
        };

        match &outcome {
            Ok(()) => debug!(?command, "Product command applied"),
            Err(e) => warn!(?command, "Product command failed: {}", e),
        }
        outcome
    }
}
