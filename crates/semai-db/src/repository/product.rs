//! # Product Repository
//!
//! Catalog CRUD, stock movement, and the transactional bulk import.
//!
//! ## Key Operations
//! - `list_sellable` - what the cashier screen shows (stock > 0)
//! - `list_newest` - what the inventory screen shows (everything)
//! - `import_batch` - CSV import rows, all-or-nothing
//! - `adjust_stock` - manual correction, conditional when decrementing

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::stock;
use semai_core::{NewProduct, Product, LOW_STOCK_THRESHOLD};

const PRODUCT_COLUMNS: &str = "id, sku, name, category_id, cost_price_rp, price_rp, \
                               reseller_price_rp, stock, image_url, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products the cashier may sell: stock > 0, name order.
    ///
    /// Items that hit zero stock disappear from this list on the next
    /// catalog refresh after a checkout.
    pub async fn list_sellable(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock > 0 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Full catalog, newest first (the inventory screen ordering).
    pub async fn list_newest(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// - [`DbError::UniqueViolation`] on a duplicate SKU
    /// - [`DbError::ForeignKeyViolation`] on an unknown category
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(sku = %new.sku, "Inserting product");

        let product = build_product(new);

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, category_id,
                cost_price_rp, price_rp, reseller_price_rp, stock,
                image_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(product.cost_price_rp)
        .bind(product.price_rp)
        .bind(product.reseller_price_rp)
        .bind(product.stock)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates an existing product's editable fields.
    ///
    /// Stock is NOT written here: inventory corrections go through
    /// [`adjust_stock`](Self::adjust_stock) and sales go through the
    /// checkout transaction, so a stale edit form can never resurrect
    /// already-sold stock.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                category_id = ?4,
                cost_price_rp = ?5,
                price_rp = ?6,
                reseller_price_rp = ?7,
                image_url = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(product.cost_price_rp)
        .bind(product.price_rp)
        .bind(product.reseller_price_rp)
        .bind(&product.image_url)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a signed delta (manual inventory correction).
    ///
    /// Decrements use the conditional form so a correction can never push
    /// stock below zero, even racing a checkout.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let mut conn = self.pool.acquire().await?;
        if delta < 0 {
            stock::take_stock(&mut conn, id, -delta).await
        } else {
            stock::put_back_stock(&mut conn, id, delta).await
        }
    }

    /// Deletes a product.
    ///
    /// A product referenced by sale or invoice lines cannot be deleted; the
    /// foreign key violation surfaces with the underlying message rather
    /// than silently orphaning ledger rows.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Inserts every parsed CSV row in one transaction.
    ///
    /// Partial imports cannot exist: one duplicate SKU or missing category
    /// rolls back the whole batch.
    pub async fn import_batch(&self, rows: &[NewProduct]) -> DbResult<usize> {
        debug!(rows = rows.len(), "Importing product batch");

        let mut tx = self.pool.begin().await?;

        for new in rows {
            let product = build_product(new);
            sqlx::query(
                r#"
                INSERT INTO products (
                    id, sku, name, category_id,
                    cost_price_rp, price_rp, reseller_price_rp, stock,
                    image_url, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&product.id)
            .bind(&product.sku)
            .bind(&product.name)
            .bind(&product.category_id)
            .bind(product.cost_price_rp)
            .bind(product.price_rp)
            .bind(product.reseller_price_rp)
            .bind(product.stock)
            .bind(&product.image_url)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(rows.len())
    }

    /// Products at or below the low-stock threshold, most depleted first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= ?1 ORDER BY stock, name"
        ))
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Sum of stock across the catalog (dashboard figure).
    pub async fn total_stock(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Assigns id and timestamps to a new product payload.
fn build_product(new: &NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        sku: new.sku.clone(),
        name: new.name.clone(),
        category_id: new.category_id.clone(),
        cost_price_rp: new.cost_price_rp,
        price_rp: new.price_rp,
        reseller_price_rp: new.reseller_price_rp,
        stock: new.stock,
        image_url: new.image_url.clone(),
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::testing::{seed_category, seed_product, test_db};
    use crate::DbError;
    use semai_core::NewProduct;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;

        let product = seed_product(&db, &cat, "AGL-001", 55_000, 50_000, 10).await;

        let fetched = db
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .expect("product should exist");
        assert_eq!(fetched.sku, "AGL-001");
        assert_eq!(fetched.stock, 10);

        let by_sku = db.products().get_by_sku("AGL-001").await.unwrap();
        assert!(by_sku.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;
        seed_product(&db, &cat, "AGL-001", 55_000, 50_000, 10).await;

        let dup = NewProduct {
            sku: "AGL-001".to_string(),
            name: "Copy".to_string(),
            category_id: cat.clone(),
            cost_price_rp: 0,
            price_rp: 1,
            reseller_price_rp: 1,
            stock: 1,
            image_url: None,
        };
        assert!(matches!(
            db.products().insert(&dup).await.unwrap_err(),
            DbError::UniqueViolation { .. }
        ));
    }

    #[tokio::test]
    async fn test_sellable_excludes_zero_stock() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;
        seed_product(&db, &cat, "A-1", 10_000, 9_000, 3).await;
        seed_product(&db, &cat, "A-2", 10_000, 9_000, 0).await;

        let sellable = db.products().list_sellable().await.unwrap();
        assert_eq!(sellable.len(), 1);
        assert_eq!(sellable[0].sku, "A-1");

        // The inventory list still shows both
        assert_eq!(db.products().list_newest().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_cannot_go_negative() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;
        let p = seed_product(&db, &cat, "A-1", 10_000, 9_000, 3).await;

        db.products().adjust_stock(&p.id, -2).await.unwrap();
        let err = db.products().adjust_stock(&p.id, -2).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { .. }));

        let after = db.products().get_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 1);
    }

    #[tokio::test]
    async fn test_import_batch_is_atomic() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;

        let row = |sku: &str| NewProduct {
            sku: sku.to_string(),
            name: format!("Plant {sku}"),
            category_id: cat.clone(),
            cost_price_rp: 5_000,
            price_rp: 10_000,
            reseller_price_rp: 9_000,
            stock: 2,
            image_url: None,
        };

        // Second row references a category that does not exist: whole batch
        // rolls back.
        let mut bad = row("B-2");
        bad.category_id = "missing".to_string();

        let err = db.products().import_batch(&[row("B-1"), bad]).await;
        assert!(err.is_err());
        assert_eq!(db.products().count().await.unwrap(), 0);

        // A clean batch inserts everything
        let n = db
            .products()
            .import_batch(&[row("B-1"), row("B-2")])
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_low_stock_and_total() {
        let db = test_db().await;
        let cat = seed_category(&db, "Aglonema").await;
        seed_product(&db, &cat, "A-1", 10_000, 9_000, 3).await;
        seed_product(&db, &cat, "A-2", 10_000, 9_000, 50).await;

        let low = db.products().low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "A-1");

        assert_eq!(db.products().total_stock().await.unwrap(), 53);
    }
}
