//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_history(db: &DbState, method: Option<PaymentMethod>)
//!     -> Result<HistoryResponse, ApiError>
//! {
//!     let orders = db.inner().orders().load().await?;
//!     ...
//! }
//! ```

use flow_db::Database;

/// Wrapper around `Database` for the terminal state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
