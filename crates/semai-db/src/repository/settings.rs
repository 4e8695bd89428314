//! # Settings Repository
//!
//! The store-identity singleton shown on receipts and invoices.
//! The migration seeds the single row; there is no insert path.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use semai_core::StoreSettings;

/// Repository for the store settings row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Reads the store settings.
    pub async fn get(&self) -> DbResult<StoreSettings> {
        let settings = sqlx::query_as::<_, StoreSettings>(
            "SELECT store_name, address, phone, logo_url FROM store_settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Replaces the store settings.
    pub async fn update(&self, settings: &StoreSettings) -> DbResult<()> {
        debug!(store_name = %settings.store_name, "Updating store settings");

        sqlx::query(
            "UPDATE store_settings SET store_name = ?1, address = ?2, phone = ?3, logo_url = ?4 \
             WHERE id = 1",
        )
        .bind(&settings.store_name)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.logo_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::test_db;
    use semai_core::StoreSettings;

    #[tokio::test]
    async fn test_seeded_row_exists() {
        let db = test_db().await;
        let settings = db.settings().get().await.unwrap();
        assert_eq!(settings.store_name, "Semai Nursery");
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let db = test_db().await;

        let updated = StoreSettings {
            store_name: "Kebun Semai".to_string(),
            address: "Jl. Raya No. 1, Bandar Lampung".to_string(),
            phone: "0812-0000-0000".to_string(),
            logo_url: Some("https://example.com/logo.jpg".to_string()),
        };
        db.settings().update(&updated).await.unwrap();

        let fetched = db.settings().get().await.unwrap();
        assert_eq!(fetched.store_name, "Kebun Semai");
        assert_eq!(fetched.logo_url.as_deref(), Some("https://example.com/logo.jpg"));
    }
}
