//! # Error Types
//!
//! Domain-specific error types for semai-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError → CoreError → DbError (semai-db) → PosError (semai-pos)
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` for derive macros (not manual impls)
//! 2. Include context in messages (SKU, available vs requested, ...)
//! 3. Errors are enum variants, never bare Strings
//! 4. Validation failures block the operation before any write happens

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (bad id, or removed since the page loaded).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds what the cart knows to be on hand.
    ///
    /// ## When This Occurs
    /// - Clicking + past the available stock
    /// - Typing a quantity larger than the stock snapshot
    ///
    /// The cart is left unchanged; the UI surfaces the message as a warning.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The product is not in the cart.
    #[error("Product not in cart: {0}")]
    LineNotInCart(String),

    /// Cart has exceeded the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Operation requires a pending invoice but the invoice is not pending.
    #[error("Invoice {invoice_id} is {status}, expected pending")]
    InvoiceNotPending { invoice_id: String, status: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures.
///
/// These block the operation before any write and are reported inline next
/// to the offending field.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (bad UUID, bad characters in a SKU, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cash payment where the tendered amount does not cover the total.
    #[error("Cash tendered ({tendered_rp}) is less than the total ({total_rp})")]
    InsufficientCash { total_rp: i64, tendered_rp: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            sku: "AGL-001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for AGL-001: available 3, requested 5"
        );
    }

    #[test]
    fn test_insufficient_cash_message() {
        let err = ValidationError::InsufficientCash {
            total_rp: 99_000,
            tendered_rp: 50_000,
        };
        assert_eq!(
            err.to_string(),
            "Cash tendered (50000) is less than the total (99000)"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(
            core_err,
            CoreError::Validation(ValidationError::EmptyCart)
        ));
    }
}
