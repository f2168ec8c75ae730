//! # Seed Data Generator
//!
//! Populates the database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bizvoice.db (default)
//! cargo run -p bizvoice-db --bin seed
//!
//! # Specify database path
//! cargo run -p bizvoice-db --bin seed -- --db ./data/bizvoice.db
//! ```
//!
//! Each product gets a description, a unit label and a price in paise.
//! A database that already has products is left alone.

use chrono::Utc;
use std::env;

use bizvoice_core::validation::{validate_price_cents, validate_product_name};
use bizvoice_core::{Money, Product};
use bizvoice_db::repository::product::generate_product_id;
use bizvoice_db::{Database, DbConfig};

/// (name, description, unit, price in paise)
const CATALOG: &[(&str, &str, &str, i64)] = &[
    ("Web Development", "Custom website build, per hour", "hrs", 150_000),
    ("Mobile App Development", "Android and iOS, per hour", "hrs", 180_000),
    ("UI/UX Design", "Wireframes and visual design, per hour", "hrs", 120_000),
    ("SEO Audit", "One-time technical SEO review", "pcs", 2_500_000),
    ("Domain Registration", ".in domain, one year", "pcs", 79_900),
    ("Shared Hosting", "Annual plan, 10 GB", "pcs", 499_900),
    ("SSL Certificate", "Domain validated, one year", "pcs", 299_900),
    ("Annual Maintenance", "Updates and backups, twelve months", "pcs", 6_000_000),
    ("Laptop Stand", "Aluminium, adjustable", "pcs", 149_900),
    ("Wireless Mouse", "2.4 GHz, USB receiver", "pcs", 69_900),
    ("Mechanical Keyboard", "Tenkeyless, brown switches", "pcs", 459_900),
    ("USB-C Hub", "7-in-1, HDMI and card reader", "pcs", 249_900),
    ("A4 Paper Ream", "75 GSM, 500 sheets", "pcs", 32_000),
    ("Printer Toner", "Compatible black cartridge", "pcs", 210_000),
    ("Office Chair", "Ergonomic mesh back", "pcs", 899_900),
    ("Consulting", "Business process consulting, per hour", "hrs", 250_000),
    ("Training Session", "On-site workshop, per day", "days", 3_500_000),
    ("Data Entry", "Per thousand records", "pcs", 150_000),
    ("Content Writing", "Per 1000 words", "pcs", 200_000),
    ("Logo Design", "Three concepts, two revisions", "pcs", 1_500_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bizvoice.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bizvoice Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bizvoice.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bizvoice Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating catalog...");

    let mut generated = 0;
    for (name, description, unit, price_cents) in CATALOG {
        validate_product_name(name)?;
        validate_price_cents(*price_cents)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: name.to_string(),
            description: Some(description.to_string()),
            current_price_cents: *price_cents,
            unit: unit.to_string(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }

        println!("  {:<28} {:>14} / {}", product.name, product.price().to_string(), product.unit);
        generated += 1;
    }

    println!();
    println!("✓ Generated {} products", generated);

    let hits = db.products().search("development", 10).await?;
    println!("  Search 'development': {} results", hits.len());

    let total: Money = CATALOG.iter().map(|(_, _, _, p)| Money::from_cents(*p)).sum();
    println!("  Catalog value at list price: {}", total);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
