//! # Invoicing
//!
//! Wholesale orchestration: issue an invoice from the cart, settle it when
//! the customer pays, reverse it when the deal falls through.
//!
//! Invoices always charge the standard price; the reseller toggle belongs
//! to the cashier screen only.

use tracing::info;
use uuid::Uuid;

use chrono::NaiveDate;
use semai_core::validation::validate_customer_name;
use semai_core::{Invoice, PriceMode, ValidationError};
use semai_db::{Database, InvoiceDraft, InvoiceLineDraft};

use crate::error::PosError;
use crate::retry::{commit_with_retry, CommitOutcome};
use crate::session::CartState;

// =============================================================================
// Request
// =============================================================================

/// Customer and payment-terms details for a new invoice.
#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_note: Option<String>,
}

// =============================================================================
// Operations
// =============================================================================

/// Issues an invoice from the current cart.
///
/// Same shape as checkout: validate first, then one transaction over
/// header + lines + stock decrements. The cart clears only on success.
pub async fn issue_invoice(
    db: &Database,
    cart_state: &CartState,
    request: &InvoiceRequest,
) -> Result<Invoice, PosError> {
    validate_customer_name(&request.customer_name)?;

    let lines = cart_state.with_cart(|c| c.lines().to_vec());
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let total_rp: i64 = lines
        .iter()
        .map(|l| l.line_subtotal(PriceMode::Standard).rupiah())
        .sum();

    let draft = InvoiceDraft {
        id: Uuid::new_v4().to_string(),
        customer_name: request.customer_name.trim().to_string(),
        customer_contact: request.customer_contact.clone(),
        total_rp,
        due_date: request.due_date,
        due_note: request.due_note.clone(),
        lines: lines
            .iter()
            .map(|l| InvoiceLineDraft {
                product_id: l.product_id.clone(),
                product_name: l.name.clone(),
                quantity: l.quantity,
                unit_price_rp: l.price_rp,
                subtotal_rp: l.line_subtotal(PriceMode::Standard).rupiah(),
            })
            .collect(),
    };

    let invoices = db.invoices();
    let invoice = match commit_with_retry("issue_invoice", || invoices.issue(&draft)).await? {
        CommitOutcome::Fresh(invoice) => invoice,
        CommitOutcome::Replayed => invoices
            .get_by_id(&draft.id)
            .await?
            .ok_or_else(|| PosError::internal("committed invoice missing after replay"))?,
    };

    cart_state.with_cart_mut(|c| c.clear());

    info!(invoice_id = %invoice.id, customer = %invoice.customer_name, "Invoice issued");
    Ok(invoice)
}

/// Marks a pending invoice paid. Settling twice fails.
pub async fn settle_invoice(db: &Database, invoice_id: &str) -> Result<(), PosError> {
    db.invoices().settle(invoice_id).await?;
    Ok(())
}

/// Reverses one invoice: stock restored, records removed, exactly once.
pub async fn reverse_invoice(db: &Database, invoice_id: &str) -> Result<(), PosError> {
    db.invoices().reverse(invoice_id).await?;
    Ok(())
}

/// Reverses a batch of invoices (the list screen's bulk delete).
///
/// Sequential and fail-fast: the count of completed reversals comes back
/// with the error so the operator knows where it stopped.
pub async fn reverse_invoices(db: &Database, invoice_ids: &[String]) -> Result<usize, PosError> {
    let mut reversed = 0usize;

    for id in invoice_ids {
        match db.invoices().reverse(id).await {
            Ok(()) => reversed += 1,
            Err(e) => {
                let pos_err: PosError = e.into();
                return Err(PosError::new(
                    pos_err.code,
                    format!(
                        "{} (reversed {reversed} of {} before failing)",
                        pos_err.message,
                        invoice_ids.len()
                    ),
                ));
            }
        }
    }

    info!(count = reversed, "Bulk invoice reversal complete");
    Ok(reversed)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use semai_core::{InvoiceStatus, NewProduct};
    use semai_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, sku: &str, stock: i64) -> semai_core::Product {
        let cat = match db.categories().list().await.unwrap().into_iter().next() {
            Some(c) => c,
            None => db.categories().insert("Aglonema").await.unwrap(),
        };
        db.products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: format!("Plant {sku}"),
                category_id: cat.id,
                cost_price_rp: 20_000,
                price_rp: 55_000,
                reseller_price_rp: 50_000,
                stock,
                image_url: None,
            })
            .await
            .unwrap()
    }

    fn request(name: &str) -> InvoiceRequest {
        InvoiceRequest {
            customer_name: name.to_string(),
            customer_contact: Some("6281200000000".to_string()),
            due_date: Some("2026-09-01".parse().unwrap()),
            due_note: None,
        }
    }

    #[tokio::test]
    async fn test_issue_from_cart_charges_standard_price() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| {
            c.add_line(&p)?;
            c.set_quantity(&p.id, 4)
        })
        .unwrap();

        let invoice = issue_invoice(&db, &cart, &request("CV Hijau Daun"))
            .await
            .unwrap();

        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.total_rp, 220_000);
        assert!(cart.with_cart(|c| c.is_empty()));

        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 6);
    }

    #[tokio::test]
    async fn test_blank_customer_name_rejected_before_writes() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();

        let err = issue_invoice(&db, &cart, &request("  ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Cart intact, stock untouched
        assert_eq!(cart.with_cart(|c| c.line_count()), 1);
        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
    }

    #[tokio::test]
    async fn test_settle_then_reverse_flow() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();
        let invoice = issue_invoice(&db, &cart, &request("CV Hijau Daun"))
            .await
            .unwrap();

        settle_invoice(&db, &invoice.id).await.unwrap();
        assert!(settle_invoice(&db, &invoice.id).await.is_err());

        reverse_invoice(&db, &invoice.id).await.unwrap();
        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);

        // Second reversal finds nothing
        assert!(reverse_invoice(&db, &invoice.id).await.is_err());
    }

    #[tokio::test]
    async fn test_bulk_reverse_reports_progress_on_failure() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();
        let inv = issue_invoice(&db, &cart, &request("CV A")).await.unwrap();

        let ids = vec![inv.id.clone(), "missing".to_string()];
        let err = reverse_invoices(&db, &ids).await.unwrap_err();
        assert!(err.message.contains("reversed 1 of 2"));

        // The first reversal stuck
        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
    }
}
