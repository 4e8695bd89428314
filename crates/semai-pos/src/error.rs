//! # POS Error Type
//!
//! Unified error type for the session layer: what the cashier-facing page
//! ultimately receives.
//!
//! ## Error Handling Strategy
//! Both a machine-readable `code` (for the page to branch on) and a
//! human-readable `message` (shown inline). Internal database details are
//! logged, not surfaced.

use serde::Serialize;
use tracing::error;

use semai_core::import::CsvError;
use semai_core::{CoreError, ValidationError};
use semai_db::DbError;

/// Error returned from session-layer operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for session-layer responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed; nothing was written
    ValidationError,

    /// Backing store rejected the operation
    WriteError,

    /// Requested quantity exceeds available stock
    InsufficientStock,

    /// Cash tendered does not cover the total
    PaymentError,

    /// Internal error
    Internal,
}

impl PosError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        PosError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        let code = match err {
            ValidationError::InsufficientCash { .. } => ErrorCode::PaymentError,
            _ => ErrorCode::ValidationError,
        };
        PosError::new(code, err.to_string())
    }
}

impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. } => {
                PosError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::ProductNotFound(id) => PosError::not_found("Product", &id),
            CoreError::Validation(v) => v.into(),
            other => PosError::new(ErrorCode::ValidationError, other.to_string()),
        }
    }
}

/// Converts database errors, logging internals and keeping user messages
/// constraint-shaped.
impl From<DbError> for PosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PosError::not_found(&entity, &id),
            DbError::StockConflict {
                product_id,
                requested,
            } => PosError::new(
                ErrorCode::InsufficientStock,
                format!("Stock no longer covers {requested} unit(s) of product {product_id}"),
            ),
            DbError::UniqueViolation { field, value } => PosError::new(
                ErrorCode::ValidationError,
                format!("{field} '{value}' already exists"),
            ),
            DbError::ForeignKeyViolation { message } => {
                // e.g. deleting a product still referenced by sale lines
                PosError::new(ErrorCode::WriteError, message)
            }
            DbError::Busy(_) | DbError::PoolExhausted => PosError::new(
                ErrorCode::WriteError,
                "The store is busy; nothing was saved. Try again.",
            ),
            other => {
                error!("Database error: {other}");
                PosError::new(ErrorCode::WriteError, "Database operation failed")
            }
        }
    }
}

/// CSV parse failures are validation errors with the row details joined in.
impl From<CsvError> for PosError {
    fn from(err: CsvError) -> Self {
        let message = match &err {
            CsvError::Rows(rows) => {
                let details: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
                format!("CSV rejected: {}", details.join("; "))
            }
            other => format!("CSV rejected: {other}"),
        };
        PosError::validation(message)
    }
}

impl std::fmt::Display for PosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for PosError {}
