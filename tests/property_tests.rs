//! Property-based tests for product filtering and prompt context bounds.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockwise_api::{
    ai::{ContextBudget, QueryContext},
    models::{CategoryFilter, Product, ProductFilter, Sale, StockFilter},
};
use uuid::Uuid;

const CATEGORIES: [&str; 4] = ["Hardware", "Electrical", "Lighting", "Garden"];

fn product_strategy() -> impl Strategy<Value = Product> {
    (
        "[A-Za-z ]{1,16}",
        0usize..CATEGORIES.len(),
        0u32..100_000,
        0i32..50,
        0i32..50,
    )
        .prop_map(|(name, category, cents, stock, min_stock)| Product {
            id: Uuid::new_v4(),
            name,
            category: CATEGORIES[category].to_string(),
            price: Decimal::new(i64::from(cents), 2),
            stock,
            min_stock,
            supplier: "Acme".to_string(),
        })
}

fn sale_strategy() -> impl Strategy<Value = Sale> {
    (1i32..20, 0i64..10_000).prop_map(|(quantity, minutes)| {
        let unit_price = Decimal::new(250, 2);
        Sale {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity,
            unit_price,
            total_amount: unit_price * Decimal::from(quantity),
            sold_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    })
}

fn stock_filter_strategy() -> impl Strategy<Value = StockFilter> {
    prop_oneof![
        Just(StockFilter::All),
        Just(StockFilter::Low),
        Just(StockFilter::Out),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn stock_filter_agrees_with_stock_levels(
        products in prop::collection::vec(product_strategy(), 0..40),
        stock in stock_filter_strategy(),
    ) {
        let filter = ProductFilter::default().stock(stock);
        let kept = filter.apply(&products);

        for product in &products {
            let expected = match stock {
                StockFilter::All => true,
                StockFilter::Low => product.stock <= product.min_stock,
                StockFilter::Out => product.stock == 0,
            };
            prop_assert_eq!(kept.iter().any(|p| p.id == product.id), expected);
        }
    }

    #[test]
    fn out_of_stock_is_subset_of_low_stock(
        products in prop::collection::vec(product_strategy(), 0..40),
    ) {
        let low = ProductFilter::default().stock(StockFilter::Low).apply(&products);
        let out = ProductFilter::default().stock(StockFilter::Out).apply(&products);

        for product in out {
            prop_assert!(low.iter().any(|p| p.id == product.id));
        }
    }

    #[test]
    fn filters_preserve_order_and_compose(
        products in prop::collection::vec(product_strategy(), 0..40),
        category in 0usize..CATEGORIES.len(),
        search in "[a-zA-Z]{0,3}",
        stock in stock_filter_strategy(),
    ) {
        let filter = ProductFilter::default()
            .search(search.clone())
            .category(CategoryFilter::Exact(CATEGORIES[category].to_string()))
            .stock(stock);
        let kept = filter.apply(&products);

        let expected: Vec<&Product> = products
            .iter()
            .filter(|p| p.category == CATEGORIES[category])
            .filter(|p| p.name.to_lowercase().contains(&search.to_lowercase()))
            .filter(|p| stock.matches(p))
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn search_ignores_case(
        products in prop::collection::vec(product_strategy(), 0..40),
        search in "[a-zA-Z]{1,3}",
    ) {
        let lower = ProductFilter::default().search(search.to_lowercase()).apply(&products);
        let upper = ProductFilter::default().search(search.to_uppercase()).apply(&products);
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn bounded_context_respects_budget(
        products in prop::collection::vec(product_strategy(), 0..60),
        sales in prop::collection::vec(sale_strategy(), 0..120),
        low_stock in prop::collection::vec(product_strategy(), 0..120),
        max_products in 1usize..30,
        max_sales in 1usize..60,
        max_chars in 1024usize..8_000,
    ) {
        let total_products = products.len();
        let total_sales = sales.len();
        let total_low_stock = low_stock.len();
        let newest = sales.iter().map(|s| s.sold_at).max();

        let context = QueryContext { products, sales, low_stock, ..QueryContext::default() };
        let budget = ContextBudget { max_products, max_sales, max_chars };
        let bounded = context.bound(&budget).unwrap();

        prop_assert!(bounded.context.products.len() <= max_products);
        prop_assert!(bounded.context.sales.len() <= max_sales);
        prop_assert!(bounded.context.low_stock.len() <= max_products);
        prop_assert!(bounded.serialized.chars().count() <= max_chars);
        prop_assert_eq!(
            bounded.context.products.len() + bounded.omitted.products,
            total_products
        );
        prop_assert_eq!(
            bounded.context.sales.len() + bounded.omitted.sales,
            total_sales
        );
        prop_assert_eq!(
            bounded.context.low_stock.len() + bounded.omitted.low_stock,
            total_low_stock
        );
        prop_assert!(bounded
            .context
            .low_stock
            .windows(2)
            .all(|pair| pair[0].stock <= pair[1].stock));
        prop_assert!(bounded
            .context
            .sales
            .windows(2)
            .all(|pair| pair[0].sold_at >= pair[1].sold_at));
        if let Some(first) = bounded.context.sales.first() {
            prop_assert_eq!(Some(first.sold_at), newest);
        }
    }
}
