//! # Receipt Handoff
//!
//! What a completed order hands to whoever produces the shareable receipt.
//!
//! ```text
//! ┌────────────────┐   ReceiptHandoff    ┌──────────────────────┐
//! │  OrderEngine   │ ──────────────────► │  ReceiptGenerator    │ ──► "https://…/receipts/receipt-…"
//! │ complete_order │  id, customer,      │  (LinkReceiptGen.)   │
//! └────────────────┘  lines, total, ts   └──────────────────────┘
//! ```
//!
//! The reference is opaque to the engine; callers print or share it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::Url;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order::Order;
use crate::types::OrderStatus;

/// Customer label used when checkout captured no name.
pub const WALK_IN_CUSTOMER: &str = "Walk-in";

// =============================================================================
// Handoff
// =============================================================================

/// The receipt-relevant facts of a completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHandoff {
    pub order_id: String,
    pub customer_name: Option<String>,
    /// Number of order lines.
    pub item_count: u32,
    pub total: Money,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

impl ReceiptHandoff {
    /// Builds the handoff; only completed orders have one.
    pub fn from_order(order: &Order) -> CoreResult<Self> {
        if order.status != OrderStatus::Completed {
            return Err(CoreError::InvalidOrderStatus {
                order_id: order.id.clone(),
                current_status: order.status.to_string(),
            });
        }

        Ok(ReceiptHandoff {
            order_id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            item_count: order.items.len() as u32,
            total: order.total,
            completed_at: order.completed_at.unwrap_or(order.created_at),
        })
    }

    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or(WALK_IN_CUSTOMER)
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Turns a handoff into a shareable reference.
pub trait ReceiptGenerator {
    fn generate(&self, handoff: &ReceiptHandoff) -> String;
}

/// Builds receipt links under a configurable base URL:
///
/// ```text
/// <base>/receipts/receipt-<millis>?order=<id>&customer=<name>&items=<n>&total=<decimal>&ts=<rfc3339>
/// ```
///
/// ## Example
/// ```rust
/// use flow_core::receipt::LinkReceiptGenerator;
///
/// let links = LinkReceiptGenerator::new("https://yourapp.com").unwrap();
/// assert_eq!(links.base_url().as_str(), "https://yourapp.com/");
/// ```
#[derive(Debug, Clone)]
pub struct LinkReceiptGenerator {
    base: Url,
}

impl LinkReceiptGenerator {
    pub fn new(base_url: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "receipt base url".to_string(),
            reason: reason.to_string(),
        };

        let base = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("must be a hierarchical URL such as https://host").into());
        }

        Ok(LinkReceiptGenerator { base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl ReceiptGenerator for LinkReceiptGenerator {
    fn generate(&self, handoff: &ReceiptHandoff) -> String {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);

        let receipt_name = format!("receipt-{}", handoff.completed_at.timestamp_millis());
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("receipts")
                .push(&receipt_name);
        }

        url.query_pairs_mut()
            .append_pair("order", &handoff.order_id)
            .append_pair("customer", handoff.customer_label())
            .append_pair("items", &handoff.item_count.to_string())
            .append_pair("total", &handoff.total.to_string())
            .append_pair(
                "ts",
                &handoff
                    .completed_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            );

        url.into()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
