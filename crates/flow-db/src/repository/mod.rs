//! # Repository Module
//!
//! Storage repositories for Flow POS.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Terminal command                                                      │
//! │       │                                                                 │
//! │       │  db.orders().prepend(&order)                                   │
//! │       ▼                                                                 │
//! │  HistoryRepository ───┐                                                │
//! │  CatalogRepository ───┼──► LocalStorage ──► local_storage table        │
//! │                       │    (key → JSON document)                       │
//! │                                                                         │
//! │  Each repository owns one key and the JSON shape stored under it.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`storage::LocalStorage`] - Raw key/value access
//! - [`order::HistoryRepository`] - Completed orders (`pos_orders`)
//! - [`product::CatalogRepository`] - Products (`pos_products`)

pub mod order;
pub mod product;
pub mod storage;
