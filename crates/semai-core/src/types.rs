//! # Domain Types
//!
//! Core domain records for Semai POS. Each struct mirrors one table in the
//! backing store; loosely-typed rows from the old system become explicit
//! records validated where external data enters.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Product ──┬── SaleLine ──── Sale          (immediate checkout)    │
//! │            │                                                       │
//! │            └── InvoiceLine ── Invoice      (deferred payment,      │
//! │                                             pending → paid,        │
//! │                                             reversible)            │
//! │                                                                    │
//! │  Category, Expense, StoreSettings          (supporting ledgers)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money columns are stored as `i64` whole rupiah (`*_rp` fields) with
//! [`Money`] accessors, so the structs derive `FromRow` without custom
//! column codecs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Price Mode
// =============================================================================

/// Which of the two price fields applies to a sale.
///
/// Selected once per transaction and applied to every line uniformly;
/// resellers buy at the lower `reseller_price_rp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    /// Walk-in retail price.
    Standard,
    /// Discounted trade price for resellers.
    Reseller,
}

impl Default for PriceMode {
    fn default() -> Self {
        PriceMode::Standard
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; requires tendered amount >= grand total.
    Cash,
    /// QRIS code scan.
    Qris,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable plant or supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier (e.g. "AGL-001").
    pub sku: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Category this product belongs to.
    pub category_id: String,

    /// Purchase cost in rupiah (for margin reporting).
    pub cost_price_rp: i64,

    /// Standard retail price in rupiah.
    pub price_rp: i64,

    /// Reseller price in rupiah.
    pub reseller_price_rp: i64,

    /// Units on hand. Never negative; the database enforces this.
    pub stock: i64,

    /// Public URL of the product photo, if one was uploaded.
    pub image_url: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price under the given price mode.
    #[inline]
    pub fn unit_price(&self, mode: PriceMode) -> Money {
        match mode {
            PriceMode::Standard => Money::from_rupiah(self.price_rp),
            PriceMode::Reseller => Money::from_rupiah(self.reseller_price_rp),
        }
    }

    /// Checks whether the requested quantity can be taken from stock.
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Whether the product should appear on the sellable list.
    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.stock > 0
    }
}

/// Fields for a product that does not exist yet.
///
/// This is the shape a CSV import row parses into and the payload the
/// inventory form submits; the repository assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category_id: String,
    pub cost_price_rp: i64,
    pub price_rp: i64,
    pub reseller_price_rp: i64,
    pub stock: i64,
    pub image_url: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

/// A product grouping (Aglonema, fertilizer, pots, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed checkout transaction. Immutable after insert; there is no
/// edit or void path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Grand total actually charged (after discount, floored at zero).
    pub total_rp: i64,
    /// Cash handed over; equals the total for non-cash methods.
    pub cash_received_rp: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.total_rp)
    }
}

/// A line item of a sale. One row per cart line at commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// quantity × unit price under the sale's price mode.
    pub subtotal_rp: i64,
    /// Which price field was charged (price-mode tag).
    pub price_mode: PriceMode,
}

// =============================================================================
// Invoice
// =============================================================================

/// Payment status of a wholesale invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued, awaiting payment.
    Pending,
    /// Settled in full.
    Paid,
}

/// A deferred-payment sale for a wholesale customer.
///
/// Issuing an invoice decrements stock exactly like a checkout; deleting
/// (reversing) one puts the stock back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    pub customer_name: String,
    /// WhatsApp number or other contact handle.
    pub customer_contact: Option<String>,
    pub total_rp: i64,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
    /// Free-form payment-terms note ("pay in 2 installments", ...).
    pub due_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.total_rp)
    }
}

/// A line item of an invoice. Carries a name snapshot so the document stays
/// readable after the product changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceLine {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_rp: i64,
    pub subtotal_rp: i64,
}

// =============================================================================
// Expense
// =============================================================================

/// Bucket an expense belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Buying plants/supplies for resale.
    StockPurchase,
    Operational,
    Payroll,
    Utilities,
}

impl ExpenseCategory {
    /// Human label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::StockPurchase => "Stock purchase",
            ExpenseCategory::Operational => "Operational",
            ExpenseCategory::Payroll => "Payroll",
            ExpenseCategory::Utilities => "Utilities",
        }
    }
}

/// One outgoing payment in the expense ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount_rp: i64,
    /// Staff user id that recorded the expense, when known.
    pub recorded_by: Option<String>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_rupiah(self.amount_rp)
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Store identity shown on receipts and invoices. Singleton row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoreSettings {
    pub store_name: String,
    pub address: String,
    pub phone: String,
    pub logo_url: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            store_name: "Semai Nursery".to_string(),
            address: String::new(),
            phone: String::new(),
            logo_url: None,
        }
    }
}

// =============================================================================
// Staff Role
// =============================================================================

/// Role attached to a staff profile.
///
/// Used for menu gating only; authorization proper is the backing store's
/// job (row-level security), not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Cashier,
    Owner,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            sku: "AGL-001".to_string(),
            name: "Aglonema Suksom".to_string(),
            category_id: "c-1".to_string(),
            cost_price_rp: 35_000,
            price_rp: 55_000,
            reseller_price_rp: 50_000,
            stock: 10,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unit_price_by_mode() {
        let p = sample_product();
        assert_eq!(p.unit_price(PriceMode::Standard).rupiah(), 55_000);
        assert_eq!(p.unit_price(PriceMode::Reseller).rupiah(), 50_000);
    }

    #[test]
    fn test_can_supply() {
        let p = sample_product();
        assert!(p.can_supply(10));
        assert!(!p.can_supply(11));
    }

    #[test]
    fn test_sellable_requires_stock() {
        let mut p = sample_product();
        assert!(p.is_sellable());
        p.stock = 0;
        assert!(!p.is_sellable());
    }

    #[test]
    fn test_expense_category_labels() {
        assert_eq!(ExpenseCategory::StockPurchase.label(), "Stock purchase");
        assert_eq!(ExpenseCategory::Payroll.label(), "Payroll");
    }
}
