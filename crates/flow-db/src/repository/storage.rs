//! # Local Storage
//!
//! A key/value table holding one JSON document per key, with the
//! `getItem` / `setItem` / `removeItem` shape of browser local storage.
//!
//! ```text
//! ┌──────────────┬───────────────────────────────┬──────────────────────────┐
//! │ key          │ value                         │ updated_at               │
//! ├──────────────┼───────────────────────────────┼──────────────────────────┤
//! │ pos_orders   │ [{"id":"…","total":738,…},…]  │ 2026-03-01T12:30:00Z     │
//! │ pos_products │ [{"id":"p1",…},…]             │ 2026-03-01T09:00:00Z     │
//! └──────────────┴───────────────────────────────┴──────────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;

const SELECT_VALUE: &str = "SELECT value FROM local_storage WHERE key = ?1";

const UPSERT_VALUE: &str = r#"
    INSERT INTO local_storage (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// Repository over the `local_storage` table.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pool: SqlitePool,
}

impl LocalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        LocalStorage { pool }
    }

    /// Returns the raw value stored under `key`.
    pub async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar(SELECT_VALUE)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, bytes = value.len(), "Writing storage item");

        sqlx::query(UPSERT_VALUE)
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes `key`. Returns whether anything was removed.
    pub async fn remove_item(&self, key: &str) -> DbResult<bool> {
        debug!(key, "Removing storage item");

        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }

    /// Reads and deserializes the JSON document under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_item(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw).await
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================
// Read-modify-write of a document must see and replace the same value, so
// repositories run both steps on one transaction.

pub(crate) async fn get_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    key: &str,
) -> DbResult<Option<String>> {
    let value: Option<String> = sqlx::query_scalar(SELECT_VALUE)
        .bind(key)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(value)
}

pub(crate) async fn set_item_tx(
    tx: &mut Transaction<'_, Sqlite>,
    key: &str,
    value: &str,
) -> DbResult<()> {
    sqlx::query(UPSERT_VALUE)
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
