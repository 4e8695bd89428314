//! # Stock Movement Discipline
//!
//! Every stock mutation in the system goes through these two statements,
//! always inside the caller's transaction.
//!
//! ## The Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ Read-modify-write loses updates under two cashier sessions:    │
//! │     SELECT stock ... ; UPDATE products SET stock = 7               │
//! │                                                                     │
//! │  ✅ Atomic conditional decrement:                                  │
//! │     UPDATE products SET stock = stock - q                          │
//! │     WHERE id = ? AND stock >= q                                    │
//! │                                                                     │
//! │  Zero rows affected means the stock is no longer there; the        │
//! │  enclosing transaction aborts and nothing is half-committed.       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::error::{DbError, DbResult};

/// Takes `quantity` units from a product's stock, failing when the stock
/// cannot cover it.
pub(crate) async fn take_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::StockConflict {
            product_id: product_id.to_string(),
            requested: quantity,
        });
    }

    Ok(())
}

/// Returns `quantity` units to a product's stock (invoice reversal,
/// manual restock).
pub(crate) async fn put_back_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Product", product_id));
    }

    Ok(())
}
