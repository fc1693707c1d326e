//! Domain types shared by the HTTP handlers, services and the API client.

pub mod filter;
pub mod product;
pub mod sales;

pub use filter::{distinct_categories, CategoryFilter, ProductFilter, StockFilter};
pub use product::{Product, ProductInput, StockStatus};
pub use sales::{DashboardStats, NewSale, Sale, TopProduct};
