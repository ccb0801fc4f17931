//! # Order Engine
//!
//! Owns the single active order of a terminal session and every transition
//! it goes through.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderEngine                                      │
//! │                                                                         │
//! │   start_new_order ──► current = Some(Order { Pending, empty })          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   add_item_to_order / update_item_quantity /                            │
//! │   remove_item_from_order / apply_discount                               │
//! │          │        (totals recomputed after every mutation)              │
//! │          │                                                              │
//! │          ├──► complete_order ──► history.insert(0, order)               │
//! │          │                       current = None                         │
//! │          │                       returns Completion + ReceiptHandoff    │
//! │          │                                                              │
//! │          └──► cancel_order ────► current = None (never persisted)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Notices
//! Operator feedback ("Added: Croissant", "Order canceled") is queued on the
//! engine and collected with [`OrderEngine::drain_notices`]. The engine does
//! no I/O of its own; persisting completed orders is the caller's job.
//!
//! ## Concurrency
//! The engine is a plain value. Shared use goes through a mutex at the
//! composition root, held for the whole read-modify-write.

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::{Order, OrderItem, OrderSnapshot};
use crate::receipt::ReceiptHandoff;
use crate::types::{CustomerInfo, Notice, OrderStatus, PaymentMethod, Product};
use crate::validation::{validate_creator_id, validate_customer, validate_notes};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MAX_PRICE_CENTS};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of [`OrderEngine::start_new_order`].
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// No order was pending.
    Started,
    /// A pending order was replaced; it is returned here and not saved.
    DiscardedPending(Order),
}

/// A successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub order: Order,
    pub receipt: ReceiptHandoff,
}

// =============================================================================
// Engine
// =============================================================================

/// The per-session order engine.
#[derive(Debug, Default)]
pub struct OrderEngine {
    current: Option<Order>,
    /// Completed orders of this session, most recent first.
    history: Vec<Order>,
    notices: Vec<Notice>,
}

impl OrderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The pending order, if one has been started.
    pub fn current_order(&self) -> Option<&Order> {
        self.current.as_ref()
    }

    /// Completed orders of this session, most recent first.
    pub fn history(&self) -> &[Order] {
        &self.history
    }

    /// UI view of the current order.
    pub fn snapshot(&self) -> Option<OrderSnapshot> {
        self.current.as_ref().map(OrderSnapshot::from)
    }

    /// Takes all queued notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Opens a fresh pending order for `creator_id`.
    ///
    /// An order that was still pending is dropped without being saved and
    /// handed back as [`StartOutcome::DiscardedPending`].
    pub fn start_new_order(&mut self, creator_id: &str) -> CoreResult<StartOutcome> {
        validate_creator_id(creator_id)?;

        let previous = self.current.replace(Order::new(creator_id.trim()));

        match previous {
            Some(order) if order.is_pending() => {
                self.notices.push(Notice::warning(format!(
                    "Discarded unfinished order with {} item(s)",
                    order.item_count()
                )));
                Ok(StartOutcome::DiscardedPending(order))
            }
            _ => Ok(StartOutcome::Started),
        }
    }

    /// Adds `quantity` of `product`, merging into an existing line for the
    /// same product.
    ///
    /// On merge the quantities add up and the notes are replaced only when
    /// new notes were given. A new line captures the product's charged price.
    pub fn add_item_to_order(
        &mut self,
        product: &Product,
        quantity: i64,
        notes: Option<String>,
    ) -> CoreResult<&Order> {
        check_quantity(quantity)?;
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(n) = &notes {
            validate_notes(n)?;
        }

        let order = self.pending_mut()?;

        if let Some(item) = order.items.iter_mut().find(|i| i.product_id == product.id) {
            let merged = item.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            check_line_total(&item.product_id, item.price, merged)?;
            item.quantity = merged;
            if notes.is_some() {
                item.notes = notes;
            }
        } else {
            if order.items.len() >= MAX_ORDER_LINES {
                return Err(CoreError::OrderTooLarge {
                    max: MAX_ORDER_LINES,
                });
            }
            check_line_total(&product.id, product.charged_price(), quantity)?;
            order
                .items
                .push(OrderItem::from_product(product, quantity, notes));
        }

        order.recalculate();
        self.notices
            .push(Notice::success(format!("Added: {}", product.name)));
        self.current_ref()
    }

    /// Removes a line by id. An unknown id leaves the order untouched.
    pub fn remove_item_from_order(&mut self, item_id: &str) -> CoreResult<Option<OrderItem>> {
        let order = self.pending_mut()?;

        let Some(index) = order.items.iter().position(|i| i.id == item_id) else {
            return Ok(None);
        };
        let removed = order.items.remove(index);
        order.recalculate();

        self.notices.push(Notice::info("Item removed"));
        Ok(Some(removed))
    }

    /// Sets a line's quantity. Anything below 1 removes the line.
    pub fn update_item_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<&Order> {
        if quantity < 1 {
            self.remove_item_from_order(item_id)?;
            return self.current_ref();
        }
        check_quantity(quantity)?;

        let order = self.pending_mut()?;
        let item = order
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
        check_line_total(&item.product_id, item.price, quantity)?;
        item.quantity = quantity;
        order.recalculate();

        self.current_ref()
    }

    /// Replaces the order discount.
    ///
    /// The discount must be non-negative and may not exceed the order value
    /// (`subtotal + tax`).
    pub fn apply_discount(&mut self, amount: Money) -> CoreResult<&Order> {
        if amount.is_negative() {
            return Err(CoreError::InvalidDiscount {
                reason: "discount cannot be negative".to_string(),
            });
        }

        let order = self.pending_mut()?;
        let order_value = order.subtotal + order.tax;
        if amount > order_value {
            return Err(CoreError::InvalidDiscount {
                reason: format!("discount {} exceeds order value {}", amount, order_value),
            });
        }

        order.discount = amount;
        order.recalculate();

        self.current_ref()
    }

    /// Pays for the current order.
    ///
    /// ## Checks (state is untouched when any fails)
    /// - an order is pending (`NoActiveOrder`)
    /// - it has at least one line (`EmptyOrder`)
    /// - the discount still fits the order value (`InvalidDiscount`)
    /// - customer details, when given, are valid (`Validation`)
    pub fn complete_order(
        &mut self,
        payment_method: PaymentMethod,
        customer: Option<CustomerInfo>,
    ) -> CoreResult<Completion> {
        let order = self.pending_mut()?;
        if order.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        if order.total.is_negative() {
            return Err(CoreError::InvalidDiscount {
                reason: format!(
                    "discount {} exceeds order value {}",
                    order.discount,
                    order.subtotal + order.tax
                ),
            });
        }
        if let Some(customer) = &customer {
            validate_customer(customer)?;
        }

        let mut order = self.current.take().ok_or(CoreError::NoActiveOrder)?;
        order.status = OrderStatus::Completed;
        order.payment_method = Some(payment_method);
        if let Some(customer) = customer {
            order.customer_name = Some(customer.name.trim().to_string());
            order.customer_phone = Some(customer.phone.trim().to_string());
        }
        order.completed_at = Some(Utc::now());

        let receipt = ReceiptHandoff::from_order(&order)?;
        self.history.insert(0, order.clone());
        self.notices.push(Notice::success("Order completed successfully!"));

        Ok(Completion { order, receipt })
    }

    /// Drops the current order. Nothing is written to history.
    pub fn cancel_order(&mut self) -> Option<Order> {
        let dropped = self.current.take().map(|mut order| {
            order.status = OrderStatus::Canceled;
            order
        });
        self.notices.push(Notice::info("Order canceled"));
        dropped
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn pending_mut(&mut self) -> CoreResult<&mut Order> {
        match self.current.as_mut() {
            Some(order) if order.is_pending() => Ok(order),
            Some(order) => Err(CoreError::InvalidOrderStatus {
                order_id: order.id.clone(),
                current_status: order.status.to_string(),
            }),
            None => Err(CoreError::NoActiveOrder),
        }
    }

    fn current_ref(&self) -> CoreResult<&Order> {
        self.current.as_ref().ok_or(CoreError::NoActiveOrder)
    }
}

fn check_quantity(quantity: i64) -> CoreResult<()> {
    if quantity < 1 {
        return Err(CoreError::InvalidQuantity {
            requested: quantity,
        });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Refuses unit prices outside the catalog range, which also keeps every
/// order total inside `i64`.
fn check_line_total(product_id: &str, price: Money, quantity: i64) -> CoreResult<()> {
    let out_of_range = || CoreError::AmountOutOfRange {
        product_id: product_id.to_string(),
    };
    if !(0..=MAX_PRICE_CENTS).contains(&price.cents()) {
        return Err(out_of_range());
    }
    price.checked_mul(quantity).map(|_| ()).ok_or_else(out_of_range)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{demo_products, Catalog, CatalogLookup};
    use crate::order::calculate_totals;
    use crate::types::NoticeLevel;
    use proptest::prelude::*;

    fn catalog() -> Catalog {
        Catalog::new(demo_products())
    }

    fn product(id: &str) -> Product {
        catalog().get_product(id).cloned().unwrap()
    }

    fn started() -> OrderEngine {
        let mut engine = OrderEngine::new();
        engine.start_new_order("u1").unwrap();
        engine
    }

    fn assert_totals_consistent(order: &Order) {
        let expected = calculate_totals(&order.items, order.discount);
        assert_eq!(order.subtotal, expected.subtotal);
        assert_eq!(order.tax, expected.tax);
        assert_eq!(order.total, order.subtotal + order.tax - order.discount);
    }

    // -------------------------------------------------------------------------
    // Start
    // -------------------------------------------------------------------------

    #[test]
    fn test_start_requires_creator() {
        let mut engine = OrderEngine::new();
        let err = engine.start_new_order("").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(engine.current_order().is_none());
    }

    #[test]
    fn test_start_creates_empty_pending_order() {
        let mut engine = OrderEngine::new();
        let outcome = engine.start_new_order("u1").unwrap();
        assert_eq!(outcome, StartOutcome::Started);

        let order = engine.current_order().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.created_by, "u1");
        assert!(order.is_empty());
        assert!(order.total.is_zero());
    }

    #[test]
    fn test_start_discards_pending_order() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        let first_id = engine.current_order().unwrap().id.clone();
        engine.drain_notices();

        let outcome = engine.start_new_order("u1").unwrap();
        match outcome {
            StartOutcome::DiscardedPending(order) => assert_eq!(order.id, first_id),
            other => panic!("expected discard, got {:?}", other),
        }
        assert_ne!(engine.current_order().unwrap().id, first_id);
        assert!(engine.history().is_empty());

        let notices = engine.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    // -------------------------------------------------------------------------
    // Add / update / remove
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_requires_active_order() {
        let mut engine = OrderEngine::new();
        let err = engine.add_item_to_order(&product("p1"), 1, None).unwrap_err();
        assert!(matches!(err, CoreError::NoActiveOrder));
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut engine = started();
        let err = engine.add_item_to_order(&product("p1"), 0, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { requested: 0 }));

        let err = engine.add_item_to_order(&product("p1"), 1000, None).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert!(engine.current_order().unwrap().is_empty());
    }

    #[test]
    fn test_add_emits_notice() {
        let mut engine = started();
        engine.add_item_to_order(&product("p4"), 1, None).unwrap();

        let notices = engine.drain_notices();
        assert_eq!(notices, vec![Notice::success("Added: Croissant")]);
        assert!(engine.drain_notices().is_empty());
    }

    #[test]
    fn test_merge_on_add() {
        let mut engine = started();
        let p1 = product("p1");
        engine.add_item_to_order(&p1, 1, Some("extra hot".into())).unwrap();
        let order = engine.add_item_to_order(&p1, 2, None).unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].notes.as_deref(), Some("extra hot"));

        let order = engine.add_item_to_order(&p1, 1, Some("oat milk".into())).unwrap();
        assert_eq!(order.items[0].quantity, 4);
        assert_eq!(order.items[0].notes.as_deref(), Some("oat milk"));
    }

    #[test]
    fn test_merge_cannot_exceed_max_quantity() {
        let mut engine = started();
        let p1 = product("p1");
        engine.add_item_to_order(&p1, 998, None).unwrap();

        let err = engine.add_item_to_order(&p1, 2, None).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 1000, .. }));
        assert_eq!(engine.current_order().unwrap().items[0].quantity, 998);
    }

    #[test]
    fn test_order_line_limit() {
        let mut engine = started();
        for i in 0..MAX_ORDER_LINES {
            let p = Product::new(format!("x{}", i), "Thing", 100, 0);
            engine.add_item_to_order(&p, 1, None).unwrap();
        }
        let err = engine
            .add_item_to_order(&Product::new("one-more", "Thing", 100, 0), 1, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::OrderTooLarge { max: 100 }));
    }

    #[test]
    fn test_discounted_price_is_captured() {
        let mut engine = started();
        let order = engine.add_item_to_order(&product("p3"), 2, None).unwrap();
        assert_eq!(order.items[0].price.cents(), 499);
        assert_eq!(order.subtotal.cents(), 998);
    }

    #[test]
    fn test_catalog_edits_do_not_reach_existing_lines() {
        let mut engine = started();
        let mut coffee = product("p1");
        engine.add_item_to_order(&coffee, 1, None).unwrap();

        coffee.price_cents = 999;
        coffee.tax_rate_bps = 1800;
        coffee.name = "Coffee - Renamed".to_string();
        let order = engine.add_item_to_order(&coffee, 1, None).unwrap();

        assert_eq!(order.items.len(), 1);
        let line = &order.items[0];
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price.cents(), 399);
        assert_eq!(line.product.tax_rate_bps, 500);
        assert_eq!(line.product.name, "Coffee - Americano");
        assert_eq!(order.tax.cents(), 40);
        assert_eq!(order.total.cents(), 838);
    }

    #[test]
    fn test_price_out_of_range_is_refused() {
        let mut engine = started();
        let huge = Product::new("big", "Big", 10_000_000_000_000_000, 0);

        let err = engine.add_item_to_order(&huge, 999, None).unwrap_err();
        assert!(matches!(err, CoreError::AmountOutOfRange { .. }));
        assert!(engine.current_order().unwrap().items.is_empty());

        let ceiling = Product::new("max", "Max", MAX_PRICE_CENTS, 10_000);
        engine.add_item_to_order(&ceiling, MAX_ITEM_QUANTITY, None).unwrap();
        let order = engine.current_order().unwrap();
        assert_eq!(order.total.cents(), MAX_PRICE_CENTS * MAX_ITEM_QUANTITY * 2);
    }

    #[test]
    fn test_heterogeneous_tax_rates() {
        let mut engine = started();
        // 7.98 @ 5% → 0.40, 15.00 @ 18% → 2.70
        engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        let order = engine.add_item_to_order(&product("p5"), 1, None).unwrap();

        assert_eq!(order.subtotal.cents(), 2298);
        assert_eq!(order.tax.cents(), 310);
        assert_eq!(order.total.cents(), 2608);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        let order = engine.add_item_to_order(&product("p2"), 1, None).unwrap();
        let line = order.items[0].id.clone();

        let order = engine.update_item_quantity(&line, 0).unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, "p2");
        assert_eq!(order.subtotal.cents(), 299);
    }

    #[test]
    fn test_update_sets_exact_quantity() {
        let mut engine = started();
        let order = engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        let line = order.items[0].id.clone();

        let order = engine.update_item_quantity(&line, 5).unwrap();
        assert_eq!(order.items[0].quantity, 5);
        assert_eq!(order.subtotal.cents(), 1995);
        assert_totals_consistent(order);
    }

    #[test]
    fn test_update_unknown_item() {
        let mut engine = started();
        let err = engine.update_item_quantity("missing", 2).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));

        // Removal of an unknown line is a no-op
        assert!(engine.update_item_quantity("missing", 0).is_ok());
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        engine.drain_notices();

        assert_eq!(engine.remove_item_from_order("missing").unwrap(), None);
        assert_eq!(engine.current_order().unwrap().items.len(), 1);
        assert!(engine.drain_notices().is_empty());
    }

    #[test]
    fn test_remove_emits_notice() {
        let mut engine = started();
        let order = engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        let line = order.items[0].id.clone();
        engine.drain_notices();

        let removed = engine.remove_item_from_order(&line).unwrap().unwrap();
        assert_eq!(removed.product_id, "p1");
        assert_eq!(engine.drain_notices(), vec![Notice::info("Item removed")]);
        assert!(engine.current_order().unwrap().total.is_zero());
    }

    // -------------------------------------------------------------------------
    // Discount
    // -------------------------------------------------------------------------

    #[test]
    fn test_discount_replaces() {
        let mut engine = started();
        engine.add_item_to_order(&product("p5"), 1, None).unwrap();

        engine.apply_discount(Money::from_cents(500)).unwrap();
        let order = engine.apply_discount(Money::from_cents(300)).unwrap();

        assert_eq!(order.discount.cents(), 300);
        assert_eq!(order.total.cents(), 1500 + 270 - 300);
    }

    #[test]
    fn test_discount_bounds() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 2, None).unwrap();

        let err = engine.apply_discount(Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscount { .. }));

        let err = engine.apply_discount(Money::from_cents(839)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscount { .. }));

        let order = engine.apply_discount(Money::from_cents(838)).unwrap();
        assert!(order.total.is_zero());
    }

    #[test]
    fn test_discount_survives_item_changes() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        engine.apply_discount(Money::from_cents(100)).unwrap();

        let order = engine.add_item_to_order(&product("p2"), 1, None).unwrap();
        assert_eq!(order.discount.cents(), 100);
        assert_totals_consistent(order);
    }

    // -------------------------------------------------------------------------
    // Completion / cancellation
    // -------------------------------------------------------------------------

    #[test]
    fn test_example_scenario() {
        let mut engine = OrderEngine::new();
        engine.start_new_order("u1").unwrap();

        let order = engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        assert_eq!(order.subtotal.cents(), 798);
        assert_eq!(order.tax.cents(), 40);
        assert_eq!(order.total.cents(), 838);

        let order = engine.apply_discount(Money::from_cents(100)).unwrap();
        assert_eq!(order.total.cents(), 738);

        let completion = engine
            .complete_order(
                PaymentMethod::Cash,
                Some(CustomerInfo::new("Jane", "555-1234")),
            )
            .unwrap();

        assert_eq!(completion.order.status, OrderStatus::Completed);
        assert_eq!(completion.order.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(completion.order.customer_name.as_deref(), Some("Jane"));
        assert_eq!(completion.order.customer_phone.as_deref(), Some("555-1234"));
        assert!(completion.order.completed_at.is_some());
        assert_eq!(completion.receipt.total.cents(), 738);
        assert_eq!(completion.receipt.item_count, 1);

        assert_eq!(engine.history().len(), 1);
        assert!(engine.current_order().is_none());
    }

    #[test]
    fn test_completion_order_most_recent_first() {
        let mut engine = OrderEngine::new();

        engine.start_new_order("u1").unwrap();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        let a = engine.complete_order(PaymentMethod::Cash, None).unwrap().order;

        engine.start_new_order("u1").unwrap();
        engine.add_item_to_order(&product("p2"), 1, None).unwrap();
        let b = engine.complete_order(PaymentMethod::Card, None).unwrap().order;

        let ids: Vec<&str> = engine.history().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
        assert!(engine.current_order().is_none());
    }

    #[test]
    fn test_complete_without_order() {
        let mut engine = OrderEngine::new();
        let err = engine.complete_order(PaymentMethod::Cash, None).unwrap_err();
        assert!(matches!(err, CoreError::NoActiveOrder));
    }

    #[test]
    fn test_complete_twice_fails() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        engine.complete_order(PaymentMethod::Cash, None).unwrap();

        let err = engine.complete_order(PaymentMethod::Cash, None).unwrap_err();
        assert!(matches!(err, CoreError::NoActiveOrder));
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_complete_empty_order() {
        let mut engine = started();
        let err = engine.complete_order(PaymentMethod::Cash, None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyOrder));
        assert!(engine.current_order().is_some());
    }

    #[test]
    fn test_complete_rejects_stale_over_discount() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        engine.add_item_to_order(&product("p5"), 1, None).unwrap();
        engine.apply_discount(Money::from_cents(2000)).unwrap();

        let line = engine.current_order().unwrap().items[1].id.clone();
        engine.remove_item_from_order(&line).unwrap();
        assert!(engine.current_order().unwrap().total.is_negative());

        let err = engine.complete_order(PaymentMethod::Cash, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscount { .. }));
        assert!(engine.current_order().is_some());
    }

    #[test]
    fn test_complete_validates_customer() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();

        let err = engine
            .complete_order(PaymentMethod::Upi, Some(CustomerInfo::new("Jane", "123")))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(engine.current_order().is_some());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_cancel_discards_order() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        engine.add_item_to_order(&product("p2"), 1, None).unwrap();
        engine.drain_notices();

        let dropped = engine.cancel_order().unwrap();
        assert_eq!(dropped.status, OrderStatus::Canceled);
        assert!(engine.current_order().is_none());
        assert!(engine.history().is_empty());
        assert_eq!(engine.drain_notices(), vec![Notice::info("Order canceled")]);
    }

    #[test]
    fn test_mutation_after_completion_fails() {
        let mut engine = started();
        engine.add_item_to_order(&product("p1"), 1, None).unwrap();
        engine.complete_order(PaymentMethod::Wallet, None).unwrap();

        assert!(matches!(
            engine.apply_discount(Money::zero()).unwrap_err(),
            CoreError::NoActiveOrder
        ));
        assert!(matches!(
            engine.remove_item_from_order("x").unwrap_err(),
            CoreError::NoActiveOrder
        ));
    }

    #[test]
    fn test_snapshot() {
        let mut engine = started();
        assert_eq!(engine.snapshot().unwrap().item_count, 0);

        engine.add_item_to_order(&product("p1"), 2, None).unwrap();
        engine.add_item_to_order(&product("p4"), 1, None).unwrap();
        let snapshot = engine.snapshot().unwrap();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.status, OrderStatus::Pending);
        assert_eq!(snapshot.subtotal.cents(), 798 + 249);

        engine.cancel_order();
        assert!(engine.snapshot().is_none());
    }

    // -------------------------------------------------------------------------
    // Property tests
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, i64),
        Update(usize, i64),
        Remove(usize),
        Discount(i64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..5, 1i64..6).prop_map(|(p, q)| Op::Add(p, q)),
            (0usize..6, -1i64..12).prop_map(|(i, q)| Op::Update(i, q)),
            (0usize..6).prop_map(Op::Remove),
            (0i64..4000).prop_map(Op::Discount),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_consistent_after_every_mutation(
            ops in proptest::collection::vec(op_strategy(), 1..40)
        ) {
            let products = demo_products();
            let mut engine = OrderEngine::new();
            engine.start_new_order("u1").unwrap();

            for op in ops {
                let line_id = |engine: &OrderEngine, idx: usize| {
                    engine
                        .current_order()
                        .and_then(|o| o.items.get(idx))
                        .map(|i| i.id.clone())
                        .unwrap_or_else(|| "missing".to_string())
                };

                let _ = match op {
                    Op::Add(p, q) => engine.add_item_to_order(&products[p], q, None).map(|_| ()),
                    Op::Update(i, q) => {
                        let id = line_id(&engine, i);
                        engine.update_item_quantity(&id, q).map(|_| ())
                    }
                    Op::Remove(i) => {
                        let id = line_id(&engine, i);
                        engine.remove_item_from_order(&id).map(|_| ())
                    }
                    Op::Discount(c) => engine.apply_discount(Money::from_cents(c)).map(|_| ()),
                };

                let order = engine.current_order().unwrap();
                let expected = calculate_totals(&order.items, order.discount);
                prop_assert_eq!(order.subtotal, expected.subtotal);
                prop_assert_eq!(order.tax, expected.tax);
                prop_assert_eq!(order.total, order.subtotal + order.tax - order.discount);
                prop_assert!(order.items.iter().all(|i| i.quantity >= 1));

                let mut product_ids: Vec<&str> =
                    order.items.iter().map(|i| i.product_id.as_str()).collect();
                product_ids.sort_unstable();
                product_ids.dedup();
                prop_assert_eq!(product_ids.len(), order.items.len());
            }
        }
    }
}
