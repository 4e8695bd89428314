//! # semai-core: Pure Business Logic for Semai POS
//!
//! The heart of the system: cart math, discount math, money arithmetic,
//! CSV row parsing, and validation, all as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  semai-pos   checkout / invoicing / receipts / reports              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ★ semai-core (THIS CRATE) ★                                        │
//! │    types • money • cart • discount • import • validation            │
//! │    NO I/O • NO DATABASE • PURE FUNCTIONS                            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  semai-db    SQLite queries, migrations, repositories               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output
//! 2. **No I/O**: database, network, file system access is forbidden here
//! 3. **Integer money**: all amounts are whole rupiah (i64), never floats
//! 4. **Explicit errors**: typed enums, no strings, no panics
//!
//! ## Example
//!
//! ```rust
//! use semai_core::cart::Cart;
//! use semai_core::discount::{grand_total, Discount};
//! use semai_core::types::PriceMode;
//!
//! let cart = Cart::new();
//! let subtotal = cart.subtotal(PriceMode::Standard);
//! let total = grand_total(subtotal, &Discount::percent(10));
//! assert!(total.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod discount;
pub mod error;
pub mod import;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use discount::{grand_total, Discount, DiscountKind};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart.
///
/// Keeps runaway carts out of the checkout transaction; one nursery sale
/// never legitimately reaches this.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typo quantities (1000 instead of 10) before the stock check does.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Stock level at or below which a product counts as "low stock" on the
/// dashboard.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
