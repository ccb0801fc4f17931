//! # Orders
//!
//! The order record, its line items, and the total calculation that keeps
//! them consistent.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       calculate_totals()                                │
//! │                                                                         │
//! │  for each OrderItem:                                                    │
//! │     line   = price × quantity                    (exact, cents)         │
//! │     tax_i  = round_half_up(line × bps / 10000)   (per line)             │
//! │                                                                         │
//! │  subtotal = Σ line                                                      │
//! │  tax      = Σ tax_i                                                     │
//! │  total    = subtotal + tax − discount            (discount preserved)   │
//! │                                                                         │
//! │  Runs over the full item list after EVERY mutation. O(n), n ≤ 100.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Layout
//! Orders serialize with camelCase keys, money as integer cents and
//! timestamps as RFC 3339 strings. This is the record stored under
//! [`crate::ORDERS_STORAGE_KEY`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{OrderStatus, PaymentMethod, Product, TaxRate};

// =============================================================================
// Product Snapshot
// =============================================================================

/// Frozen copy of the product attributes a line was sold with.
///
/// Later catalog edits (price change, new tax rate) never reach a line that
/// already exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub discounted_price_cents: Option<i64>,
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub is_service: bool,
}

impl ProductSnapshot {
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        ProductSnapshot {
            id: product.id.clone(),
            name: product.name.clone(),
            price_cents: product.price_cents,
            discounted_price_cents: product.discounted_price_cents,
            tax_rate_bps: product.tax_rate_bps,
            is_service: product.is_service,
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line in an order.
///
/// ## Design Notes
/// - `id`: the line's own identity, used by update/remove
/// - `product_id`: the catalog key, used to merge repeated adds
/// - `price`: unit price actually charged, captured at add time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product: ProductSnapshot,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    pub price: Money,
}

impl OrderItem {
    /// Creates a new line from a product, capturing its charged price.
    pub fn from_product(product: &Product, quantity: i64, notes: Option<String>) -> Self {
        OrderItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product: ProductSnapshot::from(product),
            quantity,
            notes,
            price: product.charged_price(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }

    /// Tax on this line at the captured rate, rounded to the cent.
    #[inline]
    pub fn line_tax(&self) -> Money {
        self.line_total().calculate_tax(self.product.tax_rate())
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The four monetary figures of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

/// Recomputes order totals from the full item list.
///
/// Pure and deterministic; the discount is carried through unchanged.
///
/// ## Example
/// ```rust
/// use flow_core::order::{calculate_totals, OrderItem};
/// use flow_core::{Money, Product};
///
/// let coffee = Product::new("p1", "Coffee", 399, 500);
/// let cleaning = Product::new("p5", "Room Cleaning", 1500, 1800);
/// let items = vec![
///     OrderItem::from_product(&coffee, 2, None),
///     OrderItem::from_product(&cleaning, 1, None),
/// ];
///
/// let totals = calculate_totals(&items, Money::from_cents(100));
/// assert_eq!(totals.subtotal.cents(), 2298);
/// assert_eq!(totals.tax.cents(), 40 + 270);
/// assert_eq!(totals.total.cents(), 2298 + 310 - 100);
/// ```
pub fn calculate_totals(items: &[OrderItem], discount: Money) -> OrderTotals {
    let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
    let tax: Money = items.iter().map(OrderItem::line_tax).sum();

    OrderTotals {
        subtotal,
        tax,
        discount,
        total: subtotal + tax - discount,
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// ## Invariants
/// - `subtotal`, `tax` and `total` always equal [`calculate_totals`] over
///   `items` and `discount`
/// - `status` moves from `Pending` exactly once
/// - once `Completed`, the record is never mutated again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl Order {
    /// Creates an empty pending order.
    pub fn new(created_by: impl Into<String>) -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            subtotal: Money::zero(),
            tax: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
            status: OrderStatus::Pending,
            payment_method: None,
            customer_name: None,
            customer_phone: None,
            created_at: Utc::now(),
            completed_at: None,
            created_by: created_by.into(),
        }
    }

    /// Recomputes derived totals from the current items and discount.
    pub fn recalculate(&mut self) {
        let totals = calculate_totals(&self.items, self.discount);
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.total = totals.total;
    }

    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            discount: self.discount,
            total: self.total,
        }
    }

    /// Number of lines (not units).
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn find_item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Resolves a line by full id or by a unique id prefix.
    ///
    /// Terminals show shortened ids; an ambiguous prefix resolves to nothing.
    pub fn resolve_item_id(&self, key: &str) -> Option<&str> {
        if let Some(item) = self.find_item(key) {
            return Some(&item.id);
        }
        if key.is_empty() {
            return None;
        }
        let mut matches = self.items.iter().filter(|i| i.id.starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Some(&item.id),
            _ => None,
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// The read-only view of the current order handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub order_id: String,
    pub items: Vec<OrderItem>,
    pub item_count: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
    pub status: OrderStatus,
}

impl From<&Order> for OrderSnapshot {
    fn from(order: &Order) -> Self {
        OrderSnapshot {
            order_id: order.id.clone(),
            items: order.items.clone(),
            item_count: order.items.len() as u32,
            subtotal: order.subtotal,
            tax: order.tax,
            discount: order.discount,
            total: order.total,
            status: order.status,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> Product {
        Product::new("p1", "Coffee - Americano", 399, 500).with_discounted_price(0)
    }

    #[test]
    fn test_item_captures_charged_price() {
        let sandwich = Product::new("p3", "Sandwich - Veggie", 599, 500).with_discounted_price(499);
        let item = OrderItem::from_product(&sandwich, 2, Some("no onion".into()));

        assert_eq!(item.price.cents(), 499);
        assert_eq!(item.line_total().cents(), 998);
        assert_eq!(item.product.price_cents, 599);
        assert_eq!(item.notes.as_deref(), Some("no onion"));
    }

    #[test]
    fn test_totals_example() {
        let items = vec![OrderItem::from_product(&coffee(), 2, None)];
        let totals = calculate_totals(&items, Money::zero());

        assert_eq!(totals.subtotal.cents(), 798);
        assert_eq!(totals.tax.cents(), 40);
        assert_eq!(totals.total.cents(), 838);

        let totals = calculate_totals(&items, Money::from_cents(100));
        assert_eq!(totals.total.cents(), 738);
        assert_eq!(totals.discount.cents(), 100);
    }

    #[test]
    fn test_tax_rounds_per_line() {
        // Two lines of 0.10 at 5%: each 0.005 → 0.01, so 2 cents in total
        let a = Product::new("a", "A", 10, 500);
        let b = Product::new("b", "B", 10, 500);
        let items = vec![
            OrderItem::from_product(&a, 1, None),
            OrderItem::from_product(&b, 1, None),
        ];

        assert_eq!(calculate_totals(&items, Money::zero()).tax.cents(), 2);
    }

    #[test]
    fn test_empty_totals() {
        let totals = calculate_totals(&[], Money::from_cents(50));
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax.is_zero());
        assert_eq!(totals.total.cents(), -50);
    }

    #[test]
    fn test_new_order_is_pending_and_empty() {
        let order = Order::new("u1");
        assert!(order.is_pending());
        assert!(order.is_empty());
        assert_eq!(order.created_by, "u1");
        assert_eq!(order.totals(), OrderTotals::default());
    }

    #[test]
    fn test_resolve_item_id_by_prefix() {
        let mut order = Order::new("u1");
        order.items.push(OrderItem::from_product(&coffee(), 1, None));
        let id = order.items[0].id.clone();

        assert_eq!(order.resolve_item_id(&id), Some(id.as_str()));
        assert_eq!(order.resolve_item_id(&id[..8]), Some(id.as_str()));
        assert_eq!(order.resolve_item_id("zzzz"), None);
        assert_eq!(order.resolve_item_id(""), None);
    }

    #[test]
    fn test_order_json_layout() {
        let mut order = Order::new("u1");
        order.items.push(OrderItem::from_product(&coffee(), 2, None));
        order.recalculate();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["subtotal"], 798);
        assert_eq!(json["total"], 838);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["createdBy"], "u1");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert!(json["createdAt"].is_string());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_snapshot_counts_lines() {
        let mut order = Order::new("u1");
        order.items.push(OrderItem::from_product(&coffee(), 3, None));
        order.recalculate();

        let snapshot = OrderSnapshot::from(&order);
        assert_eq!(snapshot.item_count, 1);
        assert_eq!(snapshot.total, order.total);
        assert_eq!(snapshot.status, OrderStatus::Pending);
    }
}
