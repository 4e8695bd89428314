//! # semai-db: Database Layer for Semai POS
//!
//! SQLite persistence for the nursery: connection pool, embedded
//! migrations, and one repository per entity.
//!
//! ## Architecture Position
//! ```text
//! semai-pos (checkout, invoicing, reports)
//!      │
//!      ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                 semai-db (THIS CRATE)                     │
//! │                                                           │
//! │   Database ──┬── ProductRepository                        │
//! │   (pool.rs)  ├── CategoryRepository                       │
//! │              ├── SaleRepository      ← checkout txn       │
//! │              ├── InvoiceRepository   ← issue/reverse txn  │
//! │              ├── ExpenseRepository                        │
//! │              └── SettingsRepository                       │
//! └───────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! SQLite (WAL mode, foreign keys on)
//! ```
//!
//! ## Invariants Owned Here
//! - Every multi-record mutation (checkout, invoice issue/reversal, bulk
//!   import) is a single transaction
//! - Stock never goes negative: all decrements are conditional
//!   (`WHERE stock >= q`), backed by a CHECK constraint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use semai_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("semai.db")).await?;
//! let sellable = db.products().list_sellable().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::expense::{ExpenseRepository, NewExpense};
pub use repository::invoice::{InvoiceDraft, InvoiceLineDraft, InvoiceRepository};
pub use repository::product::ProductRepository;
pub use repository::sale::{SaleDraft, SaleLineDraft, SaleRepository, SalesTotals};
pub use repository::settings::SettingsRepository;

// =============================================================================
// Test Support
// =============================================================================

/// Shared fixtures for the repository tests: an in-memory database with
/// migrations applied, plus seed helpers.
#[cfg(test)]
pub(crate) mod testing {
    use semai_core::{NewProduct, Product};

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    pub async fn seed_category(db: &Database, name: &str) -> String {
        db.categories().insert(name).await.expect("seed category").id
    }

    pub async fn seed_product(
        db: &Database,
        category_id: &str,
        sku: &str,
        price_rp: i64,
        reseller_price_rp: i64,
        stock: i64,
    ) -> Product {
        db.products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: format!("Plant {sku}"),
                category_id: category_id.to_string(),
                cost_price_rp: price_rp / 2,
                price_rp,
                reseller_price_rp,
                stock,
                image_url: None,
            })
            .await
            .expect("seed product")
    }
}
