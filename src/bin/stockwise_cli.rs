use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use stockwise_api::{
    client::{ApiClient, InventoryList, ProductCommand, QueryClient},
    models::{CategoryFilter, Product, ProductFilter, ProductInput, StockFilter},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.base_url.clone()).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Ask(args) => handle_ask(client, args, cli.json).await?,
        Commands::Products(command) => handle_products_command(&client, command, cli.json).await?,
        Commands::Dashboard(args) => handle_dashboard(&client, args, cli.json).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "stockwise", about = "Stockwise CLI for inventory and AI analysis", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "STOCKWISE_API_URL",
        default_value = "http://localhost:8080",
        help = "Base URL of the Stockwise API"
    )]
    base_url: String,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question about the inventory in plain language
    Ask(AskArgs),
    #[command(subcommand)]
    Products(ProductsCommands),
    /// Show headline stats, top sellers and low-stock products
    Dashboard(DashboardArgs),
}

#[derive(Args)]
struct AskArgs {
    #[arg(required = true, num_args = 1.., help = "Question text")]
    query: Vec<String>,
}

#[derive(Subcommand)]
enum ProductsCommands {
    /// List products with optional filters
    List(ListProductsArgs),
    /// Add a product
    Add(AddProductArgs),
    /// Update fields of an existing product
    Update(UpdateProductArgs),
    /// Delete a product and its sales history
    Delete(DeleteProductArgs),
}

#[derive(Args)]
struct ListProductsArgs {
    #[arg(long, help = "Case-insensitive substring of the product name")]
    search: Option<String>,
    #[arg(long, help = "Exact category, or 'all'")]
    category: Option<String>,
    #[arg(long, value_parser = parse_stock_filter, help = "Stock level: all, low or out")]
    stock: Option<StockFilter>,
    #[arg(long, action = ArgAction::SetTrue, help = "Also print the distinct categories")]
    categories: bool,
}

#[derive(Args)]
struct AddProductArgs {
    #[arg(long, help = "Display name for the product")]
    name: String,
    #[arg(long, help = "Product category")]
    category: String,
    #[arg(long, value_parser = parse_decimal, help = "Unit price")]
    price: Decimal,
    #[arg(long, default_value_t = 0, help = "Units on hand")]
    stock: i32,
    #[arg(long, default_value_t = 0, help = "Reorder threshold")]
    min_stock: i32,
    #[arg(long, default_value = "", help = "Supplier name")]
    supplier: String,
}

#[derive(Args)]
struct UpdateProductArgs {
    #[arg(value_parser = clap::value_parser!(Uuid), help = "Product identifier (UUID)")]
    id: Uuid,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_parser = parse_decimal)]
    price: Option<Decimal>,
    #[arg(long)]
    stock: Option<i32>,
    #[arg(long)]
    min_stock: Option<i32>,
    #[arg(long)]
    supplier: Option<String>,
}

#[derive(Args)]
struct DeleteProductArgs {
    #[arg(value_parser = clap::value_parser!(Uuid), help = "Product identifier (UUID)")]
    id: Uuid,
}

#[derive(Args)]
struct DashboardArgs {
    #[arg(long, default_value_t = 5, help = "Number of top sellers to show")]
    top: usize,
}

async fn handle_ask(client: ApiClient, args: AskArgs, json: bool) -> Result<()> {
    let mut query = QueryClient::new(client);
    query.set_input(args.query.join(" "));

    let result = query.submit().await.context("analysis request failed")?;

    if json {
        print_json(&result.answer)?;
    } else {
        println!("{}", result.rendered);
    }
    Ok(())
}

async fn handle_products_command(
    client: &ApiClient,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductsCommands::List(args) => {
            let products = client
                .list_products(&ProductFilter::default())
                .await
                .context("failed to load products")?;
            let mut list = InventoryList::new(products);
            list.set_filter(
                ProductFilter::default()
                    .search(args.search.unwrap_or_default())
                    .category(CategoryFilter::parse(args.category.as_deref().unwrap_or("")))
                    .stock(args.stock.unwrap_or_default()),
            );

            if json {
                print_json(&list.filtered())?;
            } else {
                if args.categories {
                    println!("Categories: {}", list.categories().join(", "));
                }
                let filtered = list.filtered();
                println!("{} of {} products", filtered.len(), list.products().len());
                for product in filtered {
                    render_product(product);
                }
            }
        }
        ProductsCommands::Add(args) => {
            let input = ProductInput {
                name: args.name,
                category: args.category,
                price: args.price,
                stock: args.stock,
                min_stock: args.min_stock,
                supplier: args.supplier,
            };
            let mut list = InventoryList::default();
            list.execute(client, ProductCommand::Create(input))
                .await
                .context("failed to add product")?;
            emit_products(list.products(), json, "Created")?;
        }
        ProductsCommands::Update(args) => {
            let existing = client
                .get_product(args.id)
                .await
                .with_context(|| format!("failed to load product {}", args.id))?;
            let mut input = ProductInput::from(&existing);
            if let Some(name) = args.name {
                input.name = name;
            }
            if let Some(category) = args.category {
                input.category = category;
            }
            if let Some(price) = args.price {
                input.price = price;
            }
            if let Some(stock) = args.stock {
                input.stock = stock;
            }
            if let Some(min_stock) = args.min_stock {
                input.min_stock = min_stock;
            }
            if let Some(supplier) = args.supplier {
                input.supplier = supplier;
            }

            let mut list = InventoryList::new(vec![existing]);
            list.execute(client, ProductCommand::Update { id: args.id, input })
                .await
                .context("failed to update product")?;
            emit_products(list.products(), json, "Updated")?;
        }
        ProductsCommands::Delete(args) => {
            let mut list = InventoryList::default();
            list.execute(client, ProductCommand::Delete(args.id))
                .await
                .context("failed to delete product")?;
            if json {
                print_json(&serde_json::json!({ "deleted": args.id }))?;
            } else {
                println!("Deleted product {}", args.id);
            }
        }
    }

    Ok(())
}

async fn handle_dashboard(client: &ApiClient, args: DashboardArgs, json: bool) -> Result<()> {
    let (stats, top, low) = tokio::try_join!(
        client.dashboard_stats(),
        client.top_products(args.top),
        client.low_stock()
    )
    .context("failed to load dashboard")?;

    if json {
        return print_json(&serde_json::json!({
            "stats": stats,
            "top_products": top,
            "low_stock": low,
        }));
    }

    println!("Products:        {}", stats.total_products);
    println!("Categories:      {}", stats.category_count);
    println!("Units in stock:  {}", stats.total_stock_units);
    println!("Inventory value: {}", stats.inventory_value);
    println!("Sales:           {} ({} units)", stats.total_sales, stats.units_sold);
    println!("Revenue:         {}", stats.total_revenue);
    println!(
        "Low stock:       {} ({} out of stock)",
        stats.low_stock_count, stats.out_of_stock_count
    );

    println!("\nTop sellers:");
    for (rank, item) in top.iter().enumerate() {
        println!(
            "{:>2}. {} [{}] • {} units • {}",
            rank + 1,
            item.name,
            item.category,
            item.units_sold,
            item.revenue
        );
    }

    println!("\nLow stock:");
    for product in &low {
        render_product(product);
    }

    Ok(())
}

fn emit_products(products: &[Product], json: bool, verb: &str) -> Result<()> {
    for product in products {
        if json {
            print_json(product)?;
        } else {
            print!("{} ", verb);
            render_product(product);
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_product(product: &Product) {
    println!(
        "- {} • {} [{}] • {} @ {} • min {} • {} ({})",
        product.id,
        product.name,
        product.category,
        product.stock,
        product.price,
        product.min_stock,
        product.supplier,
        product.stock_status()
    );
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("invalid decimal '{raw}'"))
}

fn parse_stock_filter(raw: &str) -> Result<StockFilter, String> {
    StockFilter::from_str(raw).map_err(|_| format!("invalid stock filter '{raw}' (all, low, out)"))
}
