//! # Seed Data Generator
//!
//! Populates a register database with a demo café catalog, dining tables
//! and a couple of regular customers.
//!
//! ## Usage
//! ```bash
//! # Seed ./cashier_dev.db with the default 8 tables
//! cargo run -p cashier-db --bin seed
//!
//! # Custom path and table count
//! cargo run -p cashier-db --bin seed -- --db ./data/cashier.db --tables 12
//! ```
//!
//! Records are produced through `PosEngine` and written as the same JSON
//! snapshots the register persists, so a seeded database hydrates exactly
//! like one the register wrote itself.

use std::env;

use cashier_core::{CustomerDraft, Money, PosEngine, ProductDraft, TableDraft};
use cashier_db::{Database, DbConfig};

/// Demo catalog: (category, [(name, price in SAR halalas, stock)]).
const CATALOG: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Hot Drinks",
        &[
            ("Arabic Coffee", 800, 120),
            ("Espresso", 1000, 80),
            ("Cappuccino", 1500, 60),
            ("Karak Tea", 600, 150),
            ("Mint Tea", 500, 150),
        ],
    ),
    (
        "Cold Drinks",
        &[
            ("Iced Latte", 1800, 40),
            ("Fresh Orange Juice", 1400, 30),
            ("Lemon Mint", 1200, 30),
            ("Mineral Water", 300, 200),
        ],
    ),
    (
        "Bakery",
        &[
            ("Croissant", 900, 25),
            ("Cheese Fatayer", 700, 40),
            ("Zaatar Manakish", 800, 40),
            ("Date Maamoul", 400, 90),
        ],
    ),
    (
        "Desserts",
        &[
            ("Kunafa", 2200, 15),
            ("Basbousa", 1300, 20),
            ("Chocolate Cake", 1900, 12),
        ],
    ),
];

const CUSTOMERS: &[(&str, &str)] = &[("Ahmed Ali", "0501234567"), ("Sara Omar", "0559876543")];

struct Args {
    db_path: String,
    tables: u32,
    force: bool,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        db_path: String::from("./cashier_dev.db"),
        tables: 8,
        force: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(path) = args.get(i + 1) {
                    parsed.db_path = path.clone();
                    i += 1;
                }
            }
            "--tables" | "-t" => {
                if let Some(n) = args.get(i + 1) {
                    parsed.tables = n.parse().unwrap_or(parsed.tables);
                    i += 1;
                }
            }
            "--force" | "-f" => parsed.force = true,
            "--help" | "-h" => {
                println!("Cashier POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./cashier_dev.db)");
                println!("  -t, --tables <N>    Number of dining tables (default: 8)");
                println!("  -f, --force         Overwrite existing records");
                println!("  -h, --help          Show this help message");
                return None;
            }
            _ => {}
        }
        i += 1;
    }

    Some(parsed)
}

fn build_engine(tables: u32) -> Result<PosEngine, Box<dyn std::error::Error>> {
    let mut engine = PosEngine::default();

    for (category, _) in CATALOG {
        engine.add_category(category)?;
    }

    for (category, items) in CATALOG {
        for (name, halalas, stock) in items.iter() {
            engine.add_product(&ProductDraft {
                name: name.to_string(),
                category: category.to_string(),
                price: Money::from_minor(*halalas),
                quantity: *stock,
                image: None,
            })?;
        }
    }

    for n in 1..=tables {
        engine.add_table(&TableDraft {
            name: format!("Table {n}"),
            seats: if n % 3 == 0 { 6 } else { 4 },
        })?;
    }

    for (name, phone) in CUSTOMERS {
        engine.add_customer(&CustomerDraft {
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
        })?;
    }

    Ok(engine)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = parse_args() else {
        return Ok(());
    };

    println!("🌱 Cashier POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", args.db_path);
    println!("Tables:   {}", args.tables);
    println!();

    let db = Database::new(DbConfig::new(&args.db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.kv().count().await?;
    if existing > 0 && !args.force {
        println!("⚠ Database already has {} records", existing);
        println!("  Skipping seed to avoid clobbering them.");
        println!("  Re-run with --force to overwrite.");
        return Ok(());
    }

    let mut engine = build_engine(args.tables)?;
    let collections = engine.take_dirty();

    for collection in collections {
        let json = engine.snapshot(collection)?;
        db.kv().set(collection.key(), &json).await?;
        println!("  ✓ {:<14} {:>6} bytes", collection.key(), json.len());
    }

    println!();
    println!(
        "✓ Seeded {} products, {} tables, {} customers",
        engine.products().len(),
        engine.tables().len(),
        engine.customers().len()
    );

    db.close().await;
    Ok(())
}
