//! # Sale Repository
//!
//! Checkout persistence and sales aggregates.
//!
//! ## The Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  record_sale(draft)                                                 │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    INSERT sale (total, cash received, method)                       │
//! │    for each line:                                                   │
//! │      INSERT sale_line (quantity, subtotal, price-mode tag)          │
//! │      UPDATE products SET stock = stock - q                          │
//! │              WHERE id = ? AND stock >= q   ── 0 rows → ROLLBACK     │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Either the sale, every line, and every decrement land together,    │
//! │  or none of them do. No partial ledgers, ever.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sale id is generated by the caller, which makes a retried commit
//! idempotent: replaying an already-committed draft trips the primary key
//! instead of double-charging.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::stock;
use semai_core::{PaymentMethod, PriceMode, Sale, SaleLine};

// =============================================================================
// Drafts
// =============================================================================

/// One line of a finalized cart, ready to persist.
#[derive(Debug, Clone)]
pub struct SaleLineDraft {
    pub product_id: String,
    pub quantity: i64,
    /// quantity × unit price under the sale's price mode.
    pub subtotal_rp: i64,
    pub price_mode: PriceMode,
}

/// A finalized checkout, ready to persist.
///
/// The id is client-generated (UUID v4) before the first commit attempt;
/// see the module docs for why.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub id: String,
    pub total_rp: i64,
    pub cash_received_rp: i64,
    pub payment_method: PaymentMethod,
    pub lines: Vec<SaleLineDraft>,
}

// =============================================================================
// Aggregates
// =============================================================================

/// Income figures for the reports screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesTotals {
    pub total_income_rp: i64,
    pub transaction_count: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a finalized checkout atomically. See the module docs.
    pub async fn record_sale(&self, draft: &SaleDraft) -> DbResult<Sale> {
        debug!(sale_id = %draft.id, lines = draft.lines.len(), "Recording sale");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_rp, cash_received_rp, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&draft.id)
        .bind(draft.total_rp)
        .bind(draft.cash_received_rp)
        .bind(draft.payment_method)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (id, sale_id, product_id, quantity, subtotal_rp, price_mode)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&draft.id)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.subtotal_rp)
            .bind(line.price_mode)
            .execute(&mut *tx)
            .await?;

            stock::take_stock(&mut *tx, &line.product_id, line.quantity).await?;
        }

        tx.commit().await?;

        info!(sale_id = %draft.id, total = draft.total_rp, "Sale recorded");

        Ok(Sale {
            id: draft.id.clone(),
            total_rp: draft.total_rp,
            cash_received_rp: draft.cash_received_rp,
            payment_method: draft.payment_method,
            created_at: now,
        })
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, total_rp, cash_received_rp, payment_method, created_at \
             FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, total_rp, cash_received_rp, payment_method, created_at \
             FROM sales ORDER BY created_at DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lines of one sale.
    pub async fn lines_for(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            "SELECT id, sale_id, product_id, quantity, subtotal_rp, price_mode \
             FROM sale_lines WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// All-time income and transaction count.
    pub async fn totals(&self) -> DbResult<SalesTotals> {
        let (total_income_rp, transaction_count): (i64, i64) =
            sqlx::query_as("SELECT COALESCE(SUM(total_rp), 0), COUNT(*) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        Ok(SalesTotals {
            total_income_rp,
            transaction_count,
        })
    }

    /// Income and count for sales at or after the given instant
    /// (the dashboard's "today" figures, bound to local midnight by the
    /// caller).
    pub async fn totals_since(&self, since: DateTime<Utc>) -> DbResult<SalesTotals> {
        let (total_income_rp, transaction_count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_rp), 0), COUNT(*) FROM sales WHERE created_at >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesTotals {
            total_income_rp,
            transaction_count,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
