//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied by sqlx, which records each one in `_sqlx_migrations`.
//!
//! ```text
//!   migrations/sqlite/
//!   └── 001_local_storage.sql   local_storage(key, value, updated_at)
//! ```
//!
//! Files are applied in name order and checksummed. Once a file has shipped,
//! change the schema with a new `NNN_name.sql` instead of editing it.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever has not been applied yet.
///
/// sqlx checks the checksum of every applied migration on each run, so a
/// shipped file that was edited afterwards fails here with
/// [`DbError::Migration`](crate::DbError::Migration).
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let total = MIGRATOR.migrations.len();
    let before = migration_status(pool).await.map_or(0, |(_, applied)| applied);

    MIGRATOR.run(pool).await?;

    if before >= total {
        debug!(total, "Schema is up to date");
    } else {
        info!(applied = total - before, "Schema migrated");
    }
    Ok(())
}

/// `(embedded, applied)` migration counts.
///
/// Fails on a database that has never been migrated, since the bookkeeping
/// table does not exist yet.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok((MIGRATOR.migrations.len(), applied.max(0) as usize))
}
