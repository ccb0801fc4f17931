//! # History Commands
//!
//! Read and clear the stored order history, and summarise sales by payment
//! method. History lives in local storage, so completed orders from earlier
//! sessions are included.

use flow_core::history::{filter_orders, PaymentSummary};
use flow_core::{Order, PaymentMethod};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub filter: Option<PaymentMethod>,
    /// Most recent first.
    pub orders: Vec<Order>,
}

/// Lists stored orders, optionally only those paid with `method`.
pub async fn list_history(
    db: &DbState,
    method: Option<PaymentMethod>,
) -> Result<HistoryResponse, ApiError> {
    debug!(method = ?method, "list_history command");

    let stored = db.inner().orders().load().await?;
    let orders = filter_orders(&stored, method).into_iter().cloned().collect();

    Ok(HistoryResponse {
        filter: method,
        orders,
    })
}

/// Totals and per-method breakdown over the stored history.
pub async fn payment_summary(
    db: &DbState,
    method: Option<PaymentMethod>,
) -> Result<PaymentSummary, ApiError> {
    debug!(method = ?method, "payment_summary command");

    let stored = db.inner().orders().load().await?;
    Ok(PaymentSummary::from_orders(&stored, method))
}

/// Deletes the stored history. Returns whether anything was stored.
pub async fn clear_history(db: &DbState) -> Result<bool, ApiError> {
    debug!("clear_history command");

    let removed = db.inner().orders().clear().await?;
    info!(removed, "History cleared");
    Ok(removed)
}
