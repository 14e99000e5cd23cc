//! # Seed Data Generator
//!
//! Populates the database with a small sweets catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./sweetstock_dev.db
//! cargo run -p sweetstock-db --bin seed
//!
//! # Specify database path
//! cargo run -p sweetstock-db --bin seed -- --db ./data/sweetstock.db
//!
//! # Record a few demo sales as well
//! cargo run -p sweetstock-db --bin seed -- --sales
//! ```
//!
//! ## Generated Data
//! - Suppliers and retailers
//! - One product per sweet, two batches each with staggered expiry so the
//!   expiry alert and FIFO paths have something to show
//! - Optional demo sales drawn through the normal FIFO write path

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::env;
use sweetstock_core::{
    Money, NewProduct, NewPurchase, NewRetailer, NewSale, NewSupplier, SizeUnit,
};
use sweetstock_db::{Database, DbConfig};

/// (name, category, pack grams, unit cost in paise)
const SWEETS: &[(&str, &str, i64, i64)] = &[
    ("Kaju Katli", "Barfi", 250, 21000),
    ("Motichoor Laddu", "Laddu", 500, 16000),
    ("Besan Laddu", "Laddu", 500, 14000),
    ("Soan Papdi", "Flaky", 250, 6000),
    ("Gulab Jamun", "Syrup", 1000, 18000),
    ("Rasgulla", "Syrup", 1000, 17000),
    ("Milk Cake", "Barfi", 250, 12000),
    ("Peda", "Milk", 250, 11000),
    ("Jalebi", "Fried", 500, 9000),
    ("Dry Fruit Chikki", "Chikki", 200, 8000),
];

const SUPPLIERS: &[(&str, &str)] = &[
    ("Bikaner Sweets Co", "Bikaner"),
    ("Mathura Peda Bhandar", "Mathura"),
    ("Agra Petha House", "Agra"),
];

const RETAILERS: &[(&str, &str)] = &[
    ("Sharma General Stores", "General Trade"),
    ("Mithai Mahal", "Sweet Shop"),
    ("FreshCart Online", "E-commerce"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./sweetstock_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sales" | "-s" => with_sales = true,
            "--help" | "-h" => {
                println!("SweetStock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./sweetstock_dev.db)");
                println!("  -s, --sales        Also record demo sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 SweetStock Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut supplier_ids = Vec::new();
    for (name, city) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .create(NewSupplier {
                name: name.to_string(),
                city: Some(city.to_string()),
                ..Default::default()
            })
            .await?;
        supplier_ids.push(supplier.id);
    }

    let mut retailer_ids = Vec::new();
    for (name, channel) in RETAILERS {
        let retailer = db
            .retailers()
            .create(NewRetailer {
                name: name.to_string(),
                channel: Some(channel.to_string()),
                ..Default::default()
            })
            .await?;
        retailer_ids.push(retailer.id);
    }

    println!("✓ {} suppliers, {} retailers", supplier_ids.len(), retailer_ids.len());

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut batches = 0;
    let mut product_ids = Vec::new();

    for (idx, (name, category, grams, cost)) in SWEETS.iter().enumerate() {
        let product = db
            .products()
            .create(NewProduct {
                name: name.to_string(),
                category: Some(category.to_string()),
                brand: None,
            })
            .await?;
        product_ids.push(product.id);

        // Older lot close to expiry, newer lot with a longer shelf life.
        let lots = [
            ("A", 20 + (idx as i64 % 5) * 4, 2 + idx as i64, *cost),
            ("B", 40, 30 + idx as i64 * 3, *cost + 500),
        ];

        for (suffix, quantity, shelf_days, unit_cost) in lots {
            let batch_code = format!(
                "{}-{}",
                name.split_whitespace()
                    .map(|w| w.chars().next().unwrap_or('X'))
                    .collect::<String>()
                    .to_uppercase(),
                suffix
            );

            let purchase = NewPurchase {
                product_id: product.id,
                batch_code: batch_code.clone(),
                quantity,
                unit_cost: Money::from_paise(unit_cost),
                expiry_date: today + Duration::days(shelf_days),
                supplier_name: None,
                unit_size_value: Decimal::from(*grams),
                unit_size_unit: SizeUnit::G,
                supplier_id: Some(supplier_ids[idx % supplier_ids.len()]),
            };

            if let Err(e) = db.batches().create(purchase, None).await {
                eprintln!("Failed to insert batch {}: {}", batch_code, e);
                continue;
            }
            batches += 1;
        }
    }

    println!("✓ {} products, {} batches in {:?}", product_ids.len(), batches, start.elapsed());

    if with_sales {
        let mut sales = 0;
        for (idx, product_id) in product_ids.iter().enumerate().filter(|(i, _)| i % 2 == 0) {
            let (_, _, _, cost) = SWEETS[idx];
            let sale = NewSale {
                product_id: *product_id,
                quantity: 5 + idx as i64,
                // 30% markup over the older lot
                selling_price: Money::from_paise(cost * 13 / 10),
                customer_name: None,
                unit_size_value: Decimal::from(SWEETS[idx].2),
                unit_size_unit: SizeUnit::G,
                retailer_id: Some(retailer_ids[idx % retailer_ids.len()]),
                invoice_number: Some(format!("SEED-{:04}", idx + 1)),
            };

            match db.sales().record(sale, None).await {
                Ok(_) => sales += 1,
                Err(e) => eprintln!("Failed to record sale for product {}: {}", product_id, e),
            }
        }
        println!("✓ {} demo sales recorded", sales);
    }

    let overview = db.batches().overview().await?;
    println!();
    println!("Stock: {} units across {} batches", overview.total_units, overview.total_batches);

    let alerts = db
        .batches()
        .expiring_within(sweetstock_core::DEFAULT_EXPIRY_ALERT_DAYS, today)
        .await?;
    println!("Expiring within {} days: {} batches", sweetstock_core::DEFAULT_EXPIRY_ALERT_DAYS, alerts.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
