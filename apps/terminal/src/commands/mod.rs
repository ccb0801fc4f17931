//! # Commands Module
//!
//! The operations the terminal (or any other front end) can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── order.rs    ◄─── Current order lifecycle and checkout
//! ├── product.rs  ◄─── Catalog listing and lookup
//! └── history.rs  ◄─── Stored order history and sales summaries
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  flow> add p1 2                                                         │
//! │         │                                                               │
//! │         │ (clap multicall parse)                                        │
//! │         ▼                                                               │
//! │  ReplCommand::Add { product: "p1", quantity: 2, notes: [] }             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::order::add_item(                                             │
//! │      orders: &OrderState,    ◄── only the state it needs               │
//! │      catalog: &CatalogState,                                            │
//! │      "p1", 2, None,                                                     │
//! │  ) -> Result<OrderResponse, ApiError>                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  render::order(...) → printed lines                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses are plain `Serialize` structs, so they can be emitted as JSON
//! as easily as they are rendered for the terminal.

pub mod history;
pub mod order;
pub mod product;
