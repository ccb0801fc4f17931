//! # flow-db: Local Storage Layer for Flow POS
//!
//! This crate persists what must outlive a terminal session: the history of
//! completed orders and the product catalog. It uses SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Flow POS Data Flow                               │
//! │                                                                         │
//! │  Terminal command (pay)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     flow-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌──────────────┐ │   │
//! │  │   │   Database    │    │   Repositories   │   │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│ HistoryRepository│   │  (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │ CatalogRepository│   │ 001_local_   │ │   │
//! │  │   │               │    │ LocalStorage     │   │   storage    │ │   │
//! │  │   └───────────────┘    └──────────────────┘   └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        <platform data dir>/flow-pos/flow.db                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Storage, history and catalog repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flow_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/flow.db")).await?;
//!
//! db.orders().prepend(&completed_order).await?;
//! let history = db.orders().load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, Location};

pub use repository::order::HistoryRepository;
pub use repository::product::CatalogRepository;
pub use repository::storage::LocalStorage;
