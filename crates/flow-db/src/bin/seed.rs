//! # Seed Data Generator
//!
//! Writes the demo catalog into a Flow POS database.
//!
//! ## Usage
//! ```bash
//! # Seed ./flow_dev.db (skips if products already exist)
//! cargo run -p flow-db --bin seed
//!
//! # Specify database path, overwrite an existing catalog
//! cargo run -p flow-db --bin seed -- --db ./data/flow.db --force
//! ```
//!
//! ## Seeded Products
//! The five demo products: Americano, English Breakfast tea, Veggie
//! sandwich (promotional price), Croissant and the Room Cleaning service.

use flow_core::catalog::demo_products;
use flow_db::{Database, DbConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./flow_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Flow POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./flow_dev.db)");
                println!("  -f, --force        Replace an existing catalog");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Flow POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 && !force {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed. Pass --force to replace them.");
        db.close().await;
        return Ok(());
    }

    let products = demo_products();
    db.products().save_all(&products).await?;

    println!();
    for product in &products {
        println!(
            "  {:<4} {:<26} {:>7}  tax {}",
            product.id,
            product.name,
            product.charged_price().to_string(),
            product.tax_rate()
        );
    }
    println!();
    println!("✓ Seeded {} products", products.len());

    db.close().await;
    Ok(())
}
