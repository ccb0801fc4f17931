//! # State Module
//!
//! Application state for the terminal, split into focused containers so
//! each command takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Terminal (lib.rs)                          │   │
//! │  │  owns one of each, hands out references to commands             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │       ┌───────────────┬──────┴────────┬────────────────┐               │
//! │       ▼               ▼               ▼                ▼                │
//! │  ┌──────────┐  ┌──────────────┐  ┌──────────┐  ┌──────────────┐        │
//! │  │OrderState│  │ CatalogState │  │ DbState  │  │ ConfigState  │        │
//! │  │Arc<Mutex<│  │ Arc<Catalog> │  │ Database │  │ store name   │        │
//! │  │ Order-   │  │              │  │ (SQLite  │  │ currency     │        │
//! │  │ Engine>> │  │              │  │  pool)   │  │ receipt links│        │
//! │  └──────────┘  └──────────────┘  └──────────┘  └──────────────┘        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • OrderState: one command at a time holds the engine                  │
//! │  • CatalogState: read-only after startup                               │
//! │  • DbState: the pool is internally synchronized                        │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod db;
mod order;

pub use catalog::CatalogState;
pub use config::{ConfigError, ConfigState};
pub use db::DbState;
pub use order::OrderState;
