//! # semai-pos: Cashier Session Layer for Semai POS
//!
//! The layer page code talks to. It owns the terminal session (cart,
//! staff identity) and orchestrates the transactional repositories in
//! semai-db with validate-first semantics.
//!
//! ## Control Flow
//! ```text
//! catalog list ──► CartState (add/update/remove lines)
//!                      │
//!                      ▼  finalize: price mode, discount, payment
//!                  checkout() ───► one SQL transaction ───► Receipt
//!                      │                                     │
//!                 cart cleared,                        nota text for
//!                 catalog refreshed                    print/WhatsApp
//! ```
//!
//! Failure keeps the cashier's state: the cart is only consumed by a
//! committed sale or issued invoice.
//!
//! ## Modules
//!
//! - [`session`] - cart state and staff session context
//! - [`checkout`] - sale commit + receipt
//! - [`invoicing`] - invoice issue / settle / reverse
//! - [`receipt`] - receipt data and plain-text nota rendering
//! - [`importer`] - catalog CSV import
//! - [`reports`] - sales, dashboard, and expense summaries
//! - [`error`] - the unified [`PosError`]

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod importer;
pub mod invoicing;
pub mod receipt;
pub mod reports;
pub mod session;

mod retry;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{checkout, CheckoutRequest};
pub use error::{ErrorCode, PosError};
pub use importer::{csv_template, import_catalog_csv, ImportOutcome};
pub use invoicing::{
    issue_invoice, reverse_invoice, reverse_invoices, settle_invoice, InvoiceRequest,
};
pub use receipt::{Receipt, ReceiptLine};
pub use reports::{dashboard, expense_report, sales_report};
pub use session::{accessible_menus, CartState, Menu, StaffSession};
