// Inventory and sales
pub mod analytics;
pub mod products;
pub mod sales;

// Natural-language analysis
pub mod ai_query;
pub mod data_source;

pub use ai_query::{AiQueryError, AiQueryOutcome, AiQueryService};
pub use analytics::AnalyticsService;
pub use data_source::{DatabaseDataSource, InventoryDataSource};
pub use products::ProductService;
pub use sales::SalesService;
