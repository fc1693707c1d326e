use crate::config::AiConfig;
use crate::models::{DashboardStats, Product, Sale, TopProduct};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inventory snapshot the model reasons over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryContext {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub stats: DashboardStats,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<Product>,
}

/// Upper bounds on how much of the snapshot is sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    pub max_products: usize,
    pub max_sales: usize,
    pub max_chars: usize,
}

impl From<&AiConfig> for ContextBudget {
    fn from(cfg: &AiConfig) -> Self {
        Self {
            max_products: cfg.max_context_products,
            max_sales: cfg.max_context_sales,
            max_chars: cfg.max_context_chars,
        }
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self::from(&AiConfig::default())
    }
}

/// Records dropped from the snapshot to stay within budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OmittedRecords {
    pub products: usize,
    pub sales: usize,
    pub low_stock: usize,
    pub top_products: usize,
}

impl OmittedRecords {
    pub fn is_empty(&self) -> bool {
        self.products == 0 && self.sales == 0 && self.low_stock == 0 && self.top_products == 0
    }
}

#[derive(Debug, Clone)]
pub struct BoundedContext {
    pub context: QueryContext,
    pub omitted: OmittedRecords,
    /// JSON rendering of `context`, as embedded in the prompt
    pub serialized: String,
}

impl QueryContext {
    /// Trims the snapshot to `budget`.
    ///
    /// Sales are ordered newest first and the low-stock list lowest stock
    /// first before truncation; the low-stock list shares the product limit.
    /// While the serialized form is over `max_chars`, sales, products, the
    /// low-stock list and top products are halved in that order. Stats are
    /// always kept.
    pub fn bound(mut self, budget: &ContextBudget) -> Result<BoundedContext, serde_json::Error> {
        let mut omitted = OmittedRecords::default();

        self.sales.sort_by(|a, b| b.sold_at.cmp(&a.sold_at));
        self.low_stock
            .sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
        omitted.sales += truncate_to(&mut self.sales, budget.max_sales);
        omitted.products += truncate_to(&mut self.products, budget.max_products);
        omitted.low_stock += truncate_to(&mut self.low_stock, budget.max_products);

        let serialized = loop {
            let serialized = serde_json::to_string(&self)?;
            if serialized.chars().count() <= budget.max_chars {
                break serialized;
            }
            if !self.sales.is_empty() {
                omitted.sales += halve(&mut self.sales);
            } else if !self.products.is_empty() {
                omitted.products += halve(&mut self.products);
            } else if !self.low_stock.is_empty() {
                omitted.low_stock += halve(&mut self.low_stock);
            } else if !self.top_products.is_empty() {
                omitted.top_products += halve(&mut self.top_products);
            } else {
                break serialized;
            }
        };

        Ok(BoundedContext {
            context: self,
            omitted,
            serialized,
        })
    }
}

fn halve<T>(items: &mut Vec<T>) -> usize {
    let keep = items.len() / 2;
    truncate_to(items, keep)
}

fn truncate_to<T>(items: &mut Vec<T>, keep: usize) -> usize {
    let dropped = items.len().saturating_sub(keep);
    items.truncate(keep);
    dropped
}
