//! # Catalog CSV Import
//!
//! The bulk-import path: parse the uploaded file (pure, in core), then
//! insert every row in one transaction. A file with any malformed row
//! imports nothing.

use tracing::info;

use semai_core::import::parse_catalog_csv;
pub use semai_core::import::{csv_template, CSV_HEADER};
use semai_db::Database;

use crate::error::PosError;

/// What a successful import did.
#[derive(Debug, Clone, Copy)]
pub struct ImportOutcome {
    pub inserted: usize,
}

/// Imports a catalog CSV file's contents.
///
/// ## Failure Modes
/// - Parse errors (bad header, malformed numbers, wrong column counts)
///   come back as one validation error listing every offending line
/// - Store rejections (duplicate SKU, unknown category) roll the whole
///   batch back
pub async fn import_catalog_csv(db: &Database, csv_text: &str) -> Result<ImportOutcome, PosError> {
    let rows = parse_catalog_csv(csv_text)?;

    let inserted = db.products().import_batch(&rows).await?;

    info!(inserted, "Catalog CSV imported");
    Ok(ImportOutcome { inserted })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use semai_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_import_two_rows() {
        let db = test_db().await;
        let cat = db.categories().insert("Aglonema").await.unwrap();

        let csv = format!(
            "{CSV_HEADER}\n\
             AGL-001,Aglonema Suksom,{id},35000,55000,50000,10\n\
             MON-001,Monstera Deliciosa,{id},60000,95000,85000,4\n",
            id = cat.id
        );

        let outcome = import_catalog_csv(&db, &csv).await.unwrap();
        assert_eq!(outcome.inserted, 2);

        let product = db.products().get_by_sku("AGL-001").await.unwrap().unwrap();
        assert_eq!(product.price_rp, 55_000);
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_malformed_row_imports_nothing() {
        let db = test_db().await;
        let cat = db.categories().insert("Aglonema").await.unwrap();

        let csv = format!(
            "{CSV_HEADER}\n\
             AGL-001,Aglonema Suksom,{id},35000,55000,50000,10\n\
             MON-001,Monstera Deliciosa,{id},60000,not-a-price,85000,4\n",
            id = cat.id
        );

        let err = import_catalog_csv(&db, &csv).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("line 3"));
        assert!(err.message.contains("price"));

        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_category_rolls_back_batch() {
        let db = test_db().await;

        let csv = format!(
            "{CSV_HEADER}\n\
             AGL-001,Aglonema Suksom,no-such-category,35000,55000,50000,10\n"
        );

        let err = import_catalog_csv(&db, &csv).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::WriteError);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }
}
