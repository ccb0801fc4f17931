//! # flow-core: Pure Business Logic for Flow POS
//!
//! This crate is the **heart** of Flow POS: the order engine that builds a
//! cart from the catalog, keeps its totals consistent, and moves it through
//! its lifecycle. Everything here is pure; persistence and presentation live
//! in `flow-db` and the terminal app.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Flow POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Terminal (apps/terminal)                       │   │
//! │  │    add ──► qty ──► discount ──► pay ──► receipt link            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ flow-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   order   │  │  engine   │  │  receipt  │  │   │
//! │  │   │  lookup   │─►│  totals   │─►│ lifecycle │─►│  handoff  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 flow-db (Local Storage Layer)                   │   │
//! │  │            order history, product catalog (SQLite)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TaxRate, PaymentMethod, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Order, OrderItem and the total calculation
//! - [`engine`] - The order engine: current order + lifecycle
//! - [`catalog`] - Catalog lookup collaborator
//! - [`receipt`] - Receipt handoff and link generation
//! - [`history`] - Summaries over completed orders
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use flow_core::catalog::{demo_products, Catalog, CatalogLookup};
//! use flow_core::engine::OrderEngine;
//! use flow_core::Money;
//!
//! let catalog = Catalog::new(demo_products());
//! let mut engine = OrderEngine::new();
//!
//! engine.start_new_order("u1").unwrap();
//! let americano = catalog.get_product("p1").unwrap();
//! engine.add_item_to_order(americano, 2, None).unwrap();
//!
//! let order = engine.current_order().unwrap();
//! assert_eq!(order.subtotal, Money::from_cents(798));
//! assert_eq!(order.tax, Money::from_cents(40)); // 5% of 7.98, cent-rounded
//! assert_eq!(order.total, Money::from_cents(838));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod error;
pub mod history;
pub mod money;
pub mod order;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Order, OrderItem, OrderSnapshot, OrderTotals, ProductSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines in a single order.
///
/// ## Business Reason
/// Prevents runaway orders and keeps the per-mutation recompute trivially
/// cheap.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price a product may carry (one billion in major units).
///
/// A full order at this price, `MAX_ORDER_LINES` lines of
/// `MAX_ITEM_QUANTITY` units taxed at 100%, still fits in an `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Storage key under which completed orders are persisted.
pub const ORDERS_STORAGE_KEY: &str = "pos_orders";

/// Storage key under which the product catalog is persisted.
pub const PRODUCTS_STORAGE_KEY: &str = "pos_products";
