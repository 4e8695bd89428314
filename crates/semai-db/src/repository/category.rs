//! # Category Repository
//!
//! Product groupings (Aglonema, fertilizer, pots, ...).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use semai_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories in name order.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Creates a category.
    ///
    /// Names are unique; duplicates surface as [`DbError::UniqueViolation`].
    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Renames a category.
    pub async fn rename(&self, id: &str, name: &str) -> DbResult<()> {
        debug!(id = %id, name = %name, "Renaming category");

        let result = sqlx::query("UPDATE categories SET name = ?2 WHERE id = ?1")
            .bind(id)
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::test_db;
    use crate::DbError;

    #[tokio::test]
    async fn test_insert_list_rename() {
        let db = test_db().await;

        let cat = db.categories().insert("Aglonema").await.unwrap();
        db.categories().insert("Pupuk").await.unwrap();

        let all = db.categories().list().await.unwrap();
        assert_eq!(all.len(), 2);
        // Name order
        assert_eq!(all[0].name, "Aglonema");

        db.categories().rename(&cat.id, "Aglonema Hybrid").await.unwrap();
        let renamed = db.categories().get_by_id(&cat.id).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Aglonema Hybrid");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        db.categories().insert("Aglonema").await.unwrap();

        assert!(matches!(
            db.categories().insert("Aglonema").await.unwrap_err(),
            DbError::UniqueViolation { .. }
        ));
    }
}
