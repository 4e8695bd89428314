//! # Checkout
//!
//! Turns a finalized cart into a committed sale and a receipt.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  checkout(db, cart, request)                                        │
//! │                                                                     │
//! │  1. Snapshot cart lines under the lock                              │
//! │  2. Validate: non-empty cart; cash covers the total      ── no      │
//! │     writes have happened if this fails                              │
//! │  3. Compute subtotal → discount → grand total (pure, in core)       │
//! │  4. record_sale: ONE transaction over sale + lines + stock          │
//! │     decrements, retried only on transient store failures            │
//! │  5. Success: clear the cart, hand back the Receipt; the caller      │
//! │     refreshes the catalog so sold-out items drop off the screen     │
//! │                                                                     │
//! │  On ANY failure the cart is untouched, so the cashier fixes the     │
//! │  problem and presses pay again.                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;
use uuid::Uuid;

use semai_core::{grand_total, CartLine, Discount, Money, PaymentMethod, PriceMode, ValidationError};
use semai_db::{Database, SaleDraft, SaleLineDraft};

use crate::error::PosError;
use crate::receipt::{Receipt, ReceiptLine};
use crate::retry::{commit_with_retry, CommitOutcome};
use crate::session::CartState;

// =============================================================================
// Request
// =============================================================================

/// Everything the cashier picked on the checkout panel.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub price_mode: PriceMode,
    pub discount: Discount,
    pub payment_method: PaymentMethod,
    /// Required for cash; ignored for QRIS/transfer.
    pub cash_tendered: Option<Money>,
}

// =============================================================================
// Checkout
// =============================================================================

/// Commits the cart as a sale. See the module docs for the guarantees.
pub async fn checkout(
    db: &Database,
    cart_state: &CartState,
    request: &CheckoutRequest,
) -> Result<Receipt, PosError> {
    let lines = cart_state.with_cart(|c| c.lines().to_vec());

    if lines.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let subtotal = sum_subtotal(&lines, request.price_mode);
    let discount_off = request.discount.amount_off(subtotal);
    let total = grand_total(subtotal, &request.discount);

    let (cash_received, change) = settle_payment(request, total)?;

    // Client-generated id: the retry path replays the same draft, so a
    // commit can never land twice
    let sale_id = Uuid::new_v4().to_string();

    let draft = SaleDraft {
        id: sale_id.clone(),
        total_rp: total.rupiah(),
        cash_received_rp: cash_received.rupiah(),
        payment_method: request.payment_method,
        lines: lines
            .iter()
            .map(|l| SaleLineDraft {
                product_id: l.product_id.clone(),
                quantity: l.quantity,
                subtotal_rp: l.line_subtotal(request.price_mode).rupiah(),
                price_mode: request.price_mode,
            })
            .collect(),
    };

    let sales = db.sales();
    let sale = match commit_with_retry("checkout", || sales.record_sale(&draft)).await? {
        CommitOutcome::Fresh(sale) => sale,
        CommitOutcome::Replayed => sales
            .get_by_id(&sale_id)
            .await?
            .ok_or_else(|| PosError::internal("committed sale missing after replay"))?,
    };

    // Only now is the cart consumed
    cart_state.with_cart_mut(|c| c.clear());

    info!(
        sale_id = %sale.id,
        total = sale.total_rp,
        lines = lines.len(),
        "Checkout committed"
    );

    Ok(Receipt {
        sale_id: sale.id,
        issued_at: sale.created_at,
        price_mode: request.price_mode,
        lines: lines
            .iter()
            .map(|l| ReceiptLine {
                name: l.name.clone(),
                quantity: l.quantity,
                unit_price_rp: l.unit_price(request.price_mode).rupiah(),
                subtotal_rp: l.line_subtotal(request.price_mode).rupiah(),
            })
            .collect(),
        subtotal_rp: subtotal.rupiah(),
        discount_rp: discount_off.rupiah(),
        total_rp: total.rupiah(),
        payment_method: request.payment_method,
        cash_received_rp: cash_received.rupiah(),
        change_rp: change.rupiah(),
    })
}

/// Validates the payment and derives (cash received, change).
///
/// Non-cash methods record the grand total as received and give no change.
fn settle_payment(
    request: &CheckoutRequest,
    total: Money,
) -> Result<(Money, Money), ValidationError> {
    match request.payment_method {
        PaymentMethod::Cash => {
            let tendered = request.cash_tendered.ok_or(ValidationError::Required {
                field: "cash tendered".to_string(),
            })?;
            if tendered < total {
                return Err(ValidationError::InsufficientCash {
                    total_rp: total.rupiah(),
                    tendered_rp: tendered.rupiah(),
                });
            }
            Ok((tendered, tendered - total))
        }
        PaymentMethod::Qris | PaymentMethod::Transfer => Ok((total, Money::zero())),
    }
}

fn sum_subtotal(lines: &[CartLine], mode: PriceMode) -> Money {
    lines
        .iter()
        .map(|l| l.line_subtotal(mode))
        .fold(Money::zero(), |acc, m| acc + m)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use semai_core::NewProduct;
    use semai_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(
        db: &Database,
        sku: &str,
        price_rp: i64,
        reseller_price_rp: i64,
        stock: i64,
    ) -> semai_core::Product {
        let cat = match db.categories().list().await.unwrap().into_iter().next() {
            Some(c) => c,
            None => db.categories().insert("Aglonema").await.unwrap(),
        };
        db.products()
            .insert(&NewProduct {
                sku: sku.to_string(),
                name: format!("Plant {sku}"),
                category_id: cat.id,
                cost_price_rp: price_rp / 2,
                price_rp,
                reseller_price_rp,
                stock,
                image_url: None,
            })
            .await
            .unwrap()
    }

    fn cash_request(discount: Discount, tendered_rp: i64) -> CheckoutRequest {
        CheckoutRequest {
            price_mode: PriceMode::Standard,
            discount,
            payment_method: PaymentMethod::Cash,
            cash_tendered: Some(Money::from_rupiah(tendered_rp)),
        }
    }

    /// The spec walk-through: 2 × 55.000 with 10% off, paid with 100.000.
    #[tokio::test]
    async fn test_checkout_scenario_totals_and_change() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 55_000, 50_000, 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| {
            c.add_line(&p)?;
            c.set_quantity(&p.id, 2)
        })
        .unwrap();

        let receipt = checkout(&db, &cart, &cash_request(Discount::percent(10), 100_000))
            .await
            .unwrap();

        assert_eq!(receipt.subtotal_rp, 110_000);
        assert_eq!(receipt.discount_rp, 11_000);
        assert_eq!(receipt.total_rp, 99_000);
        assert_eq!(receipt.change_rp, 1_000);

        // Stock decremented by the line quantity
        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 8);

        // Cart cleared on success
        assert!(cart.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_insufficient_cash_rejected_before_any_write() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 55_000, 50_000, 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();

        let err = checkout(&db, &cart, &cash_request(Discount::none(), 50_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        // No sale row exists and the cart still holds the line
        assert_eq!(db.sales().totals().await.unwrap().transaction_count, 0);
        assert_eq!(cart.with_cart(|c| c.line_count()), 1);

        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        let cart = CartState::new();

        let err = checkout(&db, &cart, &cash_request(Discount::none(), 100_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_reseller_mode_uses_reseller_price() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 55_000, 50_000, 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();

        let request = CheckoutRequest {
            price_mode: PriceMode::Reseller,
            discount: Discount::none(),
            payment_method: PaymentMethod::Qris,
            cash_tendered: None,
        };

        let receipt = checkout(&db, &cart, &request).await.unwrap();
        assert_eq!(receipt.total_rp, 50_000);
        // Non-cash: received equals the total, no change
        assert_eq!(receipt.cash_received_rp, 50_000);
        assert_eq!(receipt.change_rp, 0);
    }

    #[tokio::test]
    async fn test_oversized_fixed_discount_floors_total_at_zero() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 10_000, 9_000, 5).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();

        let receipt = checkout(&db, &cart, &cash_request(Discount::amount(25_000), 0))
            .await
            .unwrap();
        assert_eq!(receipt.total_rp, 0);
    }

    /// A stale cart snapshot meets the real stock level inside the
    /// transaction: everything rolls back and the cart survives for retry.
    #[tokio::test]
    async fn test_stale_stock_fails_atomically_and_preserves_cart() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 55_000, 50_000, 3).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| {
            c.add_line(&p)?;
            c.set_quantity(&p.id, 3)
        })
        .unwrap();

        // Another session takes 2 units after our snapshot
        db.products().adjust_stock(&p.id, -2).await.unwrap();

        let err = checkout(&db, &cart, &cash_request(Discount::none(), 500_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // No sale, stock untouched beyond the concurrent take, cart intact
        assert_eq!(db.sales().totals().await.unwrap().transaction_count, 0);
        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 1);
        assert_eq!(cart.with_cart(|c| c.line_count()), 1);
    }

    #[tokio::test]
    async fn test_missing_tendered_amount_for_cash() {
        let db = test_db().await;
        let p = seed_product(&db, "AGL-001", 55_000, 50_000, 10).await;

        let cart = CartState::new();
        cart.with_cart_mut(|c| c.add_line(&p)).unwrap();

        let request = CheckoutRequest {
            price_mode: PriceMode::Standard,
            discount: Discount::none(),
            payment_method: PaymentMethod::Cash,
            cash_tendered: None,
        };

        let err = checkout(&db, &cart, &request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
