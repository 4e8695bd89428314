//! # Invoice Repository
//!
//! Deferred-payment sales for wholesale customers.
//!
//! ## Lifecycle
//! ```text
//! issue ──► Pending ──settle──► Paid
//!              │
//!           reverse  (delete + restock, once and only once)
//! ```
//!
//! Issuing takes stock exactly like a checkout; reversing puts it back.
//! Reversal is guarded against running twice: the invoice row is deleted
//! inside the same transaction that restocks, and a second attempt finds
//! no row to delete before any stock moves.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use semai_core::{Invoice, InvoiceLine, InvoiceStatus};

// =============================================================================
// Drafts
// =============================================================================

/// One line of an invoice being issued. Invoices always charge the
/// standard price.
#[derive(Debug, Clone)]
pub struct InvoiceLineDraft {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_rp: i64,
    pub subtotal_rp: i64,
}

/// An invoice ready to issue. Id is client-generated, like sale drafts.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub id: String,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub total_rp: i64,
    pub due_date: Option<NaiveDate>,
    pub due_note: Option<String>,
    pub lines: Vec<InvoiceLineDraft>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Issues an invoice atomically: header + lines + stock decrements in
    /// one transaction, Pending status.
    pub async fn issue(&self, draft: &InvoiceDraft) -> DbResult<Invoice> {
        debug!(invoice_id = %draft.id, customer = %draft.customer_name, "Issuing invoice");

        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, customer_name, customer_contact, total_rp,
                status, due_date, due_note, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&draft.id)
        .bind(&draft.customer_name)
        .bind(&draft.customer_contact)
        .bind(draft.total_rp)
        .bind(InvoiceStatus::Pending)
        .bind(draft.due_date)
        .bind(&draft.due_note)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO invoice_lines (
                    id, invoice_id, product_id, product_name,
                    quantity, unit_price_rp, subtotal_rp
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&draft.id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price_rp)
            .bind(line.subtotal_rp)
            .execute(&mut *tx)
            .await?;

            stock::take_stock(&mut *tx, &line.product_id, line.quantity).await?;
        }

        tx.commit().await?;

        info!(invoice_id = %draft.id, total = draft.total_rp, "Invoice issued");

        Ok(Invoice {
            id: draft.id.clone(),
            customer_name: draft.customer_name.clone(),
            customer_contact: draft.customer_contact.clone(),
            total_rp: draft.total_rp,
            status: InvoiceStatus::Pending,
            due_date: draft.due_date,
            due_note: draft.due_note.clone(),
            created_at: now,
        })
    }

    /// Marks a pending invoice as paid.
    ///
    /// The status guard in the WHERE clause makes settling a settled (or
    /// reversed) invoice fail instead of silently succeeding.
    pub async fn settle(&self, id: &str) -> DbResult<()> {
        debug!(invoice_id = %id, "Settling invoice");

        let result = sqlx::query(
            "UPDATE invoices SET status = ?2 WHERE id = ?1 AND status = ?3",
        )
        .bind(id)
        .bind(InvoiceStatus::Paid)
        .bind(InvoiceStatus::Pending)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pending invoice", id));
        }

        info!(invoice_id = %id, "Invoice settled");
        Ok(())
    }

    /// Reverses an invoice: restores every line's stock, then removes the
    /// invoice and its lines. One transaction.
    ///
    /// ## Idempotency Guard
    /// The invoice row is deleted before any stock moves; zero rows
    /// affected means someone already reversed it and the transaction
    /// aborts with NotFound. Stock can never be restored twice.
    pub async fn reverse(&self, id: &str) -> DbResult<()> {
        debug!(invoice_id = %id, "Reversing invoice");

        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, InvoiceLine>(
            "SELECT id, invoice_id, product_id, product_name, quantity, unit_price_rp, subtotal_rp \
             FROM invoice_lines WHERE invoice_id = ?1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        // Guard first: deleting the header also cascades the lines
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        for line in &lines {
            stock::put_back_stock(&mut *tx, &line.product_id, line.quantity).await?;
        }

        tx.commit().await?;

        info!(invoice_id = %id, lines = lines.len(), "Invoice reversed, stock restored");
        Ok(())
    }

    /// Gets an invoice by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, customer_name, customer_contact, total_rp, status, \
                    due_date, due_note, created_at \
             FROM invoices WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// All invoices, newest first.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            "SELECT id, customer_name, customer_contact, total_rp, status, \
                    due_date, due_note, created_at \
             FROM invoices ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lines of one invoice.
    pub async fn lines_for(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            "SELECT id, invoice_id, product_id, product_name, quantity, unit_price_rp, subtotal_rp \
             FROM invoice_lines WHERE invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
