//! # Order State
//!
//! Holds the session's [`OrderEngine`].
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command              Lock held for            Then, unlocked           │
//! │  ───────              ─────────────            ──────────────           │
//! │                                                                         │
//! │  add_item ──────────► add + snapshot + drain                            │
//! │                                                                         │
//! │  complete_order ────► complete + drain ──────► history prepend (await)  │
//! │                                                                         │
//! │  The guard never lives across an `.await`.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use flow_core::engine::OrderEngine;

/// Shared handle to the order engine.
#[derive(Debug, Clone, Default)]
pub struct OrderState {
    engine: Arc<Mutex<OrderEngine>>,
}

impl OrderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let snapshot = orders.with_engine(|engine| engine.snapshot());
    /// ```
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderEngine) -> R,
    {
        // Every engine operation either completes or leaves the state
        // untouched, so a panic elsewhere cannot leave it half-written.
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&engine)
    }

    /// Executes a function with write access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// orders.with_engine_mut(|engine| engine.apply_discount(amount))?;
    /// ```
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderEngine) -> R,
    {
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }
}
