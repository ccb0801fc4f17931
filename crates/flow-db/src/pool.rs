//! # Storage Handle
//!
//! Opens the SQLite file behind local storage and hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("flow.db")          DbConfig::in_memory()                │
//! │       │  Location::File                 │  Location::Memory             │
//! │       │  WAL, synchronous=NORMAL        │  one connection, no WAL       │
//! │       └──────────────┬──────────────────┘                               │
//! │                      ▼                                                  │
//! │            Database::new(config)  → pool + pending migrations           │
//! │                      │                                                  │
//! │       ┌──────────────┼──────────────────┐                               │
//! │       ▼              ▼                  ▼                               │
//! │  db.storage()    db.orders()       db.products()                        │
//! │  LocalStorage    HistoryRepository CatalogRepository                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file database keeps its WAL journal next to it, so the history view can
//! read while a checkout writes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::HistoryRepository;
use crate::repository::product::CatalogRepository;
use crate::repository::storage::LocalStorage;

// =============================================================================
// Configuration
// =============================================================================

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A database file, created on first open. Its directory must exist.
    File(PathBuf),
    /// A private in-memory database, gone when the handle is closed.
    Memory,
}

/// How to open local storage.
///
/// ```rust,ignore
/// let config = DbConfig::new("./flow_dev.db").pool_size(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: Location,
    /// Upper bound on open connections. A terminal rarely needs more than
    /// one reader next to the writer.
    pub pool_size: u32,
    /// How long a statement waits for a lock held by another connection.
    pub busy_timeout: Duration,
    /// Apply pending migrations while opening.
    pub migrate: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: Location::File(path.into()),
            pool_size: 4,
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    /// Isolated storage for tests and `--in-memory` sessions.
    ///
    /// Every SQLite connection to `:memory:` gets its own database, so the
    /// pool is pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            location: Location::Memory,
            pool_size: 1,
            busy_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Opens without touching the schema.
    pub fn skip_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == Location::Memory
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            Location::Memory => SqliteConnectOptions::new().in_memory(true),
            Location::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
        };
        options.busy_timeout(self.busy_timeout)
    }

    fn describe(&self) -> String {
        match &self.location {
            Location::File(path) => path.display().to_string(),
            Location::Memory => "in-memory".to_string(),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open local storage. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens storage and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let target = config.describe();
        debug!(target = %target, pool_size = config.pool_size, "Opening local storage");

        let mut options = SqlitePoolOptions::new().max_connections(config.pool_size);
        if config.is_in_memory() {
            // The only connection holds the data; never let it be reaped.
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(format!("{}: {}", target, e)))?;

        if config.migrate {
            migrations::run_migrations(&pool).await?;
        }

        info!(target = %target, "Local storage ready");
        Ok(Database { pool })
    }

    /// `(total, applied)` migration counts.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw key/value storage.
    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.pool.clone())
    }

    /// Completed order history (`pos_orders`).
    pub fn orders(&self) -> HistoryRepository {
        HistoryRepository::new(self.pool.clone())
    }

    /// Product catalog (`pos_products`).
    pub fn products(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later repository calls fail with
    /// [`DbError::Unavailable`].
    pub async fn close(&self) {
        debug!("Closing local storage");
        self.pool.close().await;
    }

    /// Whether a trivial query still goes through.
    pub async fn is_reachable(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
