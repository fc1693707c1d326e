//! Seed data script - populates the database with demo inventory
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 12 products across four categories, some at or below their minimum stock
//! - 40 sales spread over the last 30 days

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use tracing::info;
use uuid::Uuid;

use stockwise_api::{
    db,
    entities::{product, sale},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Stockwise Seed Data ===");

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("APP__DATABASE_URL"))
        .unwrap_or_else(|_| "sqlite://stockwise.db?mode=rwc".to_string());

    info!("Connecting to database: {}", database_url);
    let db = db::establish_connection(&database_url).await?;
    db::run_migrations(&db).await?;

    info!("Creating products...");
    let products = create_products(&db).await?;
    info!("  Created {} products", products.len());

    info!("Creating sales...");
    let sales = create_sales(&db, &products).await?;
    info!("  Created {} sales", sales);

    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/products?stock=low");
    info!("  curl http://localhost:8080/api/dashboard/stats");
    info!(
        "  curl -X POST http://localhost:8080/api/ai -H 'content-type: application/json' \
         -d '{{\"query\":\"Which products should I reorder?\"}}'"
    );
    info!("Or explore interactively at: http://localhost:8080/swagger-ui");

    Ok(())
}

async fn create_products(db: &db::DbPool) -> anyhow::Result<Vec<product::Model>> {
    let products_data = vec![
        // Electronics
        ("Wireless Headphones", "Electronics", dec!(79.99), 42, 10, "SoundWorks"),
        ("USB-C Charger 65W", "Electronics", dec!(34.99), 6, 15, "VoltSupply"),
        ("Mechanical Keyboard", "Electronics", dec!(129.99), 0, 5, "KeyCraft"),
        // Office
        ("A4 Copy Paper (500)", "Office", dec!(6.49), 240, 50, "PaperMill Co"),
        ("Gel Pens (12 pack)", "Office", dec!(8.99), 18, 20, "InkLine"),
        ("Desk Organizer", "Office", dec!(24.50), 31, 5, "InkLine"),
        // Apparel
        ("Cotton T-Shirt", "Apparel", dec!(19.99), 120, 25, "ThreadHouse"),
        ("Rain Jacket", "Apparel", dec!(89.00), 9, 10, "ThreadHouse"),
        ("Wool Socks", "Apparel", dec!(12.00), 0, 30, "Northknit"),
        // Outdoor
        ("Water Bottle 1L", "Outdoor", dec!(22.00), 64, 20, "TrailGear"),
        ("Camping Lantern", "Outdoor", dec!(39.95), 14, 8, "TrailGear"),
        ("Trekking Poles", "Outdoor", dec!(59.00), 3, 4, "Summit Supply"),
    ];

    let mut created = Vec::new();
    let now = Utc::now();

    for (name, category, price, stock, min_stock, supplier) in products_data {
        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            price: Set(price),
            stock: Set(stock),
            min_stock: Set(min_stock),
            supplier: Set(supplier.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        created.push(product.insert(db).await?);
    }

    Ok(created)
}

/// Inserts historical sales directly; stock levels above already reflect them.
async fn create_sales(db: &db::DbPool, products: &[product::Model]) -> anyhow::Result<usize> {
    let now = Utc::now();
    let mut count = 0;

    for i in 0..40usize {
        let product = &products[(i * 7) % products.len()];
        let quantity = (i % 4 + 1) as i32;
        let unit_price = product.price;

        let sale = sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            total_amount: Set(unit_price * Decimal::from(quantity)),
            sold_at: Set(now - Duration::hours((i as i64) * 18)),
        };

        sale.insert(db).await?;
        count += 1;
    }

    Ok(count)
}
