//! # Cart Module
//!
//! The in-memory selection a cashier builds before checkout.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  add_line(product)                                                  │
//! │    ├── already in cart?  → quantity + 1 (if stock allows)          │
//! │    └── not in cart?      → new line with quantity 1                │
//! │                                                                     │
//! │  set_quantity(id, qty)                                              │
//! │    ├── qty < 1           → line removed                             │
//! │    ├── qty > stock       → rejected, cart unchanged                 │
//! │    └── otherwise         → quantity replaced                        │
//! │                                                                     │
//! │  Stock checks compare against the stock snapshot taken when the    │
//! │  line was added; the database transaction re-checks atomically at  │
//! │  commit time.                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PriceMode, Product};
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart.
///
/// ## Snapshot Pattern
/// Both prices and the stock level are frozen when the line is created, so
/// the cart displays consistent numbers even if the catalog changes
/// underneath it. Price mode is NOT part of the line: the mode applies to
/// the whole cart and can be toggled while lines sit in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID)
    pub product_id: String,

    /// SKU at time of adding (frozen)
    pub sku: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Standard price in rupiah at time of adding (frozen)
    pub price_rp: i64,

    /// Reseller price in rupiah at time of adding (frozen)
    pub reseller_price_rp: i64,

    /// Stock level at time of adding; the client-side ceiling for quantity
    pub available_stock: i64,

    /// Quantity selected (>= 1)
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a product snapshot.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            price_rp: product.price_rp,
            reseller_price_rp: product.reseller_price_rp,
            available_stock: product.stock,
            quantity,
        }
    }

    /// Unit price under the given mode.
    #[inline]
    pub fn unit_price(&self, mode: PriceMode) -> Money {
        match mode {
            PriceMode::Standard => Money::from_rupiah(self.price_rp),
            PriceMode::Reseller => Money::from_rupiah(self.reseller_price_rp),
        }
    }

    /// quantity × unit price under the given mode.
    #[inline]
    pub fn line_subtotal(&self, mode: PriceMode) -> Money {
        self.unit_price(mode).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cashier's current selection.
///
/// ## Invariants
/// - Lines are unique by `product_id`
/// - Every quantity is >= 1 (dropping below 1 removes the line)
/// - No quantity exceeds its line's stock snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Read access to the lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Adds one unit of a product, or bumps its quantity by one.
    ///
    /// ## Errors
    /// - [`CoreError::InsufficientStock`] when the bump would exceed the
    ///   stock snapshot (also when adding a product whose stock is zero)
    /// - [`CoreError::CartTooLarge`] past the line limit
    pub fn add_line(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let requested = line.quantity + 1;
            if requested > line.available_stock {
                return Err(CoreError::InsufficientStock {
                    sku: line.sku.clone(),
                    available: line.available_stock,
                    requested,
                });
            }
            line.quantity = requested;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        if !product.can_supply(1) {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock,
                requested: 1,
            });
        }

        self.lines.push(CartLine::from_product(product, 1));
        Ok(())
    }

    /// Replaces a line's quantity.
    ///
    /// ## Behavior
    /// - quantity < 1 removes the line (canonical removal-on-zero policy)
    /// - quantity above the stock snapshot is rejected and the cart is left
    ///   unchanged; the caller surfaces the warning
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return self.remove_line(product_id);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotInCart(product_id.to_string()))?;

        if quantity > line.available_stock {
            return Err(CoreError::InsufficientStock {
                sku: line.sku.clone(),
                available: line.available_stock,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            Err(CoreError::LineNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line subtotals under the active price mode.
    ///
    /// Pure function of cart state and mode; no side effects.
    pub fn subtotal(&self, mode: PriceMode) -> Money {
        self.lines
            .iter()
            .map(|l| l.line_subtotal(mode))
            .fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, price_rp: i64, reseller_rp: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            name: format!("Plant {id}"),
            category_id: "cat-1".to_string(),
            cost_price_rp: price_rp / 2,
            price_rp,
            reseller_price_rp: reseller_rp,
            stock,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_new_line_starts_at_one() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 55_000, 50_000, 10)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = Cart::new();
        let p = product("1", 55_000, 50_000, 10);
        cart.add_line(&p).unwrap();
        cart.add_line(&p).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_stops_at_stock_snapshot() {
        let mut cart = Cart::new();
        let p = product("1", 55_000, 50_000, 2);
        cart.add_line(&p).unwrap();
        cart.add_line(&p).unwrap();

        let err = cart.add_line(&p).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
        // Cart unchanged
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_add_out_of_stock_product_rejected() {
        let mut cart = Cart::new();
        let err = cart.add_line(&product("1", 55_000, 50_000, 0)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 55_000, 50_000, 10)).unwrap();
        cart.set_quantity("1", 7).unwrap();

        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_below_one_removes() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 55_000, 50_000, 10)).unwrap();
        cart.set_quantity("1", 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_over_stock_rejected() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 55_000, 50_000, 3)).unwrap();

        let err = cart.set_quantity("1", 4).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_subtotal_per_mode() {
        let mut cart = Cart::new();
        let p1 = product("1", 55_000, 50_000, 10);
        let p2 = product("2", 20_000, 18_000, 10);
        cart.add_line(&p1).unwrap();
        cart.add_line(&p1).unwrap();
        cart.add_line(&p2).unwrap();

        // 2 × 55.000 + 1 × 20.000
        assert_eq!(cart.subtotal(PriceMode::Standard).rupiah(), 130_000);
        // 2 × 50.000 + 1 × 18.000
        assert_eq!(cart.subtotal(PriceMode::Reseller).rupiah(), 118_000);
    }

    #[test]
    fn test_remove_missing_line_errors() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.remove_line("nope").unwrap_err(),
            CoreError::LineNotInCart(_)
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 55_000, 50_000, 10)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
