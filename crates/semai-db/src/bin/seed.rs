//! # Seed Data Generator
//!
//! Populates a database with nursery catalog data for development.
//!
//! ## Usage
//! ```bash
//! # Default: 200 products into ./semai.db
//! cargo run -p semai-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p semai-db --bin seed -- --count 1000 --db ./data/semai.db
//! ```
//!
//! Each product gets a `{CATEGORY}-{INDEX}` SKU, a plant name, a retail
//! price between Rp 15.000 and Rp 250.000, a reseller price ~10% below it,
//! and a stock level between 0 and 40.

use std::env;

use semai_core::NewProduct;
use semai_db::{Database, DbConfig};

/// Category name plus the plant names it seeds.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "AGL",
        "Aglonema",
        &[
            "Aglonema Suksom Jaipong",
            "Aglonema Red Sumatra",
            "Aglonema Lipstick",
            "Aglonema Bidadari",
            "Aglonema Big Roy",
        ],
    ),
    (
        "MON",
        "Monstera",
        &[
            "Monstera Deliciosa",
            "Monstera Adansonii",
            "Monstera Borsigiana Variegata",
        ],
    ),
    (
        "SAN",
        "Sansevieria",
        &[
            "Sansevieria Trifasciata",
            "Sansevieria Moonshine",
            "Sansevieria Golden Hahnii",
        ],
    ),
    (
        "PHI",
        "Philodendron",
        &[
            "Philodendron Birkin",
            "Philodendron Brasil",
            "Philodendron Micans",
            "Philodendron Gloriosum",
        ],
    ),
    (
        "SUP",
        "Supplies",
        &[
            "Organic Compost 5kg",
            "NPK Fertilizer 1kg",
            "Terracotta Pot 20cm",
            "Hanging Pot Set",
        ],
    ),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (count, db_path) = parse_args();

    tracing::info!(count, db = %db_path, "Seeding database");

    let db = match Database::new(DbConfig::new(&db_path)).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = seed(&db, count).await {
        tracing::error!("Seeding failed: {e}");
        std::process::exit(1);
    }

    let total = db.products().count().await.unwrap_or(0);
    tracing::info!(total, "Seeding complete");
}

fn parse_args() -> (usize, String) {
    let mut count = 200usize;
    let mut db_path = "./semai.db".to_string();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" if i + 1 < args.len() => {
                count = args[i + 1].parse().unwrap_or(count);
                i += 2;
            }
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                i += 1;
            }
        }
    }

    (count, db_path)
}

async fn seed(db: &Database, count: usize) -> Result<(), semai_db::DbError> {
    // Categories first; reuse existing ones on re-runs
    let mut category_ids = Vec::new();
    for (_, name, _) in CATEGORIES {
        let existing = db
            .categories()
            .list()
            .await?
            .into_iter()
            .find(|c| c.name == *name);
        let id = match existing {
            Some(c) => c.id,
            None => db.categories().insert(name).await?.id,
        };
        category_ids.push(id);
    }

    let mut rows = Vec::with_capacity(count);
    for i in 0..count {
        let slot = i % CATEGORIES.len();
        let (prefix, _, names) = CATEGORIES[slot];
        let name = names[i % names.len()];

        // Deterministic pseudo-variety keeps re-runs reproducible
        let price_rp = 15_000 + ((i as i64 * 7_919) % 236) * 1_000;
        let reseller_price_rp = price_rp - price_rp / 10;
        let stock = (i as i64 * 13) % 41;

        rows.push(NewProduct {
            sku: format!("{prefix}-{:04}", i + 1),
            name: format!("{name} #{}", i / CATEGORIES.len() + 1),
            category_id: category_ids[slot].clone(),
            cost_price_rp: price_rp / 2,
            price_rp,
            reseller_price_rp,
            stock,
            image_url: None,
        });
    }

    db.products().import_batch(&rows).await?;
    Ok(())
}
