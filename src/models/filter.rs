use super::product::Product;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Keyword meaning "no restriction" for category and stock filters
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StockFilter {
    #[default]
    All,
    /// stock <= min_stock
    Low,
    /// stock == 0
    Out,
}

/// Parsed through `FromStr` so query strings accept any letter case.
impl<'de> Deserialize<'de> for StockFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::unknown_variant(&raw, &["all", "low", "out"]))
    }
}

impl StockFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::Low => product.is_low_stock(),
            StockFilter::Out => product.is_out_of_stock(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(category) => product.category == *category,
        }
    }
}

/// Conjunction of name search, category and stock-status predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name; empty matches everything
    pub search: String,
    pub category: CategoryFilter,
    pub stock: StockFilter,
}

impl ProductFilter {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn stock(mut self, stock: StockFilter) -> Self {
        self.stock = stock;
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty()
            && self.category == CategoryFilter::All
            && self.stock == StockFilter::All
    }

    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());

        matches_search && self.category.matches(product) && self.stock.matches(product)
    }

    /// Returns the matching products, preserving input order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Query-string form of [`ProductFilter`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilterParams {
    /// Case-insensitive name search
    pub search: Option<String>,
    /// Exact category, or `all`
    pub category: Option<String>,
    /// `all`, `low` or `out`
    pub stock: Option<StockFilter>,
}

impl From<ProductFilterParams> for ProductFilter {
    fn from(params: ProductFilterParams) -> Self {
        ProductFilter {
            search: params.search.unwrap_or_default(),
            category: params
                .category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or_default(),
            stock: params.stock.unwrap_or_default(),
        }
    }
}

/// Distinct categories in first-seen order.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}
