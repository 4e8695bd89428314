//! # Repository Module
//!
//! Database repository implementations for Semai POS.
//!
//! ## Repository Pattern
//! Each repository isolates the SQL for one entity behind a small API, so
//! the orchestration layer never sees a query string:
//!
//! ```text
//! semai-pos checkout
//!      │   db.sales().record_sale(&draft)
//!      ▼
//! SaleRepository ── one BEGIN .. COMMIT over sale + lines + stock
//!      ▼
//! SQLite
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog CRUD, stock movement, bulk import
//! - [`category::CategoryRepository`] - product groupings
//! - [`sale::SaleRepository`] - checkout transactions and sales totals
//! - [`invoice::InvoiceRepository`] - wholesale invoices: issue, settle, reverse
//! - [`expense::ExpenseRepository`] - expense ledger
//! - [`settings::SettingsRepository`] - store identity singleton

pub mod category;
pub mod expense;
pub mod invoice;
pub mod product;
pub mod sale;
pub mod settings;

mod stock;
