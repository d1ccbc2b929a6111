//! SQLite implementation of the durable key/value store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::KvStore;
use crate::error::StoreError;

/// SQLite-backed store using `sqlx::SqlitePool`.
///
/// A single `kv_entries` table holds all session entries. The schema is
/// created on open, so the store works against a fresh file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (or creates) the store at the given file path.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the database cannot be opened or the
    /// schema cannot be created.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Opens an in-memory store, useful for tests and ephemeral sessions.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the database cannot be opened.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_entries (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv_entries")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_round_trip() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store must open");
        };
        let Ok(()) = store.set("token", "tok-123").await else {
            panic!("set failed");
        };
        let value = store.get("token").await.ok().flatten();
        assert_eq!(value.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn set_replaces_existing_value() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store must open");
        };
        let _ = store.set("current_role", "user").await;
        let _ = store.set("current_role", "merchant").await;
        let value = store.get("current_role").await.ok().flatten();
        assert_eq!(value.as_deref(), Some("merchant"));
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store must open");
        };
        let _ = store.set("a", "1").await;
        let _ = store.set("b", "2").await;

        let Ok(()) = store.delete("a").await else {
            panic!("delete failed");
        };
        assert_eq!(store.get("a").await.ok().flatten(), None);

        let Ok(()) = store.clear().await else {
            panic!("clear failed");
        };
        assert_eq!(store.get("b").await.ok().flatten(), None);
    }

    #[tokio::test]
    async fn delete_absent_key_is_ok() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store must open");
        };
        assert!(store.delete("never-set").await.is_ok());
    }

    #[tokio::test]
    async fn persists_across_pool_reopen() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("session.db");
        let Some(path) = path.to_str() else {
            panic!("non-utf8 temp path");
        };

        {
            let Ok(store) = SqliteStore::open(path).await else {
                panic!("open failed");
            };
            let _ = store.set("token", "persisted").await;
        }

        let Ok(store) = SqliteStore::open(path).await else {
            panic!("reopen failed");
        };
        let value = store.get("token").await.ok().flatten();
        assert_eq!(value.as_deref(), Some("persisted"));
    }
}
