//! # History Summaries
//!
//! Aggregates over completed orders for the payments view: total sales,
//! transaction count, average order value and a per-method breakdown,
//! optionally narrowed to a single payment method.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::order::Order;
use crate::types::PaymentMethod;

/// Count and total for one payment method.
///
/// `method` is `None` for orders stored without a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    pub method: Option<PaymentMethod>,
    pub count: u32,
    pub total: Money,
}

/// Sales figures over a set of completed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub filter: Option<PaymentMethod>,
    pub total_sales: Money,
    pub order_count: u32,
    /// Only methods that occur, in [`PaymentMethod::ALL`] order, unknown last.
    pub by_method: Vec<MethodTotal>,
}

/// Orders matching an optional payment method filter, in their original order.
pub fn filter_orders(orders: &[Order], filter: Option<PaymentMethod>) -> Vec<&Order> {
    orders
        .iter()
        .filter(|o| filter.map_or(true, |m| o.payment_method == Some(m)))
        .collect()
}

impl PaymentSummary {
    /// Summarises `orders`, keeping only those paid with `filter` when given.
    pub fn from_orders(orders: &[Order], filter: Option<PaymentMethod>) -> Self {
        let selected = filter_orders(orders, filter);

        let total_sales: Money = selected.iter().map(|o| o.total).sum();

        let methods = PaymentMethod::ALL.into_iter().map(Some).chain([None]);
        let by_method = methods
            .filter_map(|method| {
                let matching: Vec<&&Order> =
                    selected.iter().filter(|o| o.payment_method == method).collect();
                if matching.is_empty() {
                    return None;
                }
                Some(MethodTotal {
                    method,
                    count: matching.len() as u32,
                    total: matching.iter().map(|o| o.total).sum(),
                })
            })
            .collect();

        PaymentSummary {
            filter,
            total_sales,
            order_count: selected.len() as u32,
            by_method,
        }
    }

    /// Mean order value, rounded half up to the cent.
    pub fn average_order_value(&self) -> Money {
        if self.order_count == 0 {
            return Money::zero();
        }
        let n = self.order_count as i64;
        let cents = self.total_sales.cents();
        let rounded = if cents >= 0 {
            (cents + n / 2) / n
        } else {
            (cents - n / 2) / n
        };
        Money::from_cents(rounded)
    }

    /// The method used by the most orders; ties go to the earlier method.
    pub fn most_popular(&self) -> Option<&MethodTotal> {
        self.by_method
            .iter()
            .filter(|m| m.method.is_some())
            .fold(None, |best: Option<&MethodTotal>, m| match best {
                Some(b) if b.count >= m.count => Some(b),
                _ => Some(m),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
