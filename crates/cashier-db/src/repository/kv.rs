//! # Key-Value Repository
//!
//! SQLite-backed collection records.
//!
//! ## Table
//! ```text
//! kv_store
//! ┌──────────────┬───────────────────────────┬──────────────────────────┐
//! │ key (PK)     │ value (JSON document)     │ updated_at (RFC 3339)    │
//! ├──────────────┼───────────────────────────┼──────────────────────────┤
//! │ products     │ [{"id":1,"name":...}]     │ 2024-05-20T15:30:00Z     │
//! │ settings     │ {"taxRate":1500,...}      │ 2024-05-20T15:31:12Z     │
//! └──────────────┴───────────────────────────┴──────────────────────────┘
//! ```
//!
//! Writes are upserts: the last value written for a key wins.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for key-value records.
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the value stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Inserts or replaces the value stored under `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        debug!(key = %key, bytes = value.len(), "Writing record");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists every stored key, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    /// Removes a record. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl KeyValueStore for KvRepository {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        KvRepository::get(self, key).await
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        KvRepository::set(self, key, value).await
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_upsert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        assert_eq!(kv.get("products").await.unwrap(), None);

        kv.set("products", "[]").await.unwrap();
        kv.set("products", r#"[{"id":1}]"#).await.unwrap();

        assert_eq!(
            kv.get("products").await.unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        assert_eq!(kv.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keys_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        kv.set("tables", "[]").await.unwrap();
        kv.set("categories", "[]").await.unwrap();
        assert_eq!(kv.keys().await.unwrap(), vec!["categories", "tables"]);

        assert!(kv.delete("tables").await.unwrap());
        assert!(!kv.delete("tables").await.unwrap());
        assert_eq!(kv.keys().await.unwrap(), vec!["categories"]);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cashier.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.kv().set("settings", r#"{"currency":"USD"}"#).await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.kv().get("settings").await.unwrap().as_deref(),
            Some(r#"{"currency":"USD"}"#)
        );
    }
}
