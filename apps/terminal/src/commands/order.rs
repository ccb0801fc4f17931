//! # Order Commands
//!
//! Commands for the current order: start, edit, discount, pay, cancel.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   start ──► [pending] ──add/qty/remove/discount──► [pending]            │
//! │                 │                                      │                │
//! │                 │ cancel                               │ pay            │
//! │                 ▼                                      ▼                │
//! │            (dropped, not stored)              [completed] ──► history   │
//! │                                                        │                │
//! │                                                        └──► receipt URL │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command drains the engine's notices while it still holds the lock
//! and returns them with the response.

use flow_core::catalog::CatalogLookup;
use flow_core::engine::StartOutcome;
use flow_core::receipt::ReceiptGenerator;
use flow_core::{
    CoreError, CustomerInfo, Money, Notice, Order, OrderItem, OrderSnapshot, PaymentMethod,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CatalogState, ConfigState, DbState, OrderState};

// =============================================================================
// Responses
// =============================================================================

/// The current order (if any) plus notices raised by the command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order: Option<OrderSnapshot>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    pub order: OrderSnapshot,
    /// The unfinished order that was dropped to make room, if there was one.
    pub discarded: Option<OrderSnapshot>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub removed: Option<OrderItem>,
    pub order: Option<OrderSnapshot>,
    pub notices: Vec<Notice>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: Order,
    pub receipt_url: String,
    /// Whether the order reached local storage. Checkout succeeds either way.
    pub persisted: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub canceled: Option<Order>,
    pub notices: Vec<Notice>,
}

// =============================================================================
// Commands
// =============================================================================

/// Returns the current order.
pub fn get_order(orders: &OrderState) -> OrderResponse {
    debug!("get_order command");
    orders.with_engine_mut(|engine| OrderResponse {
        order: engine.snapshot(),
        notices: engine.drain_notices(),
    })
}

/// Opens a new pending order.
///
/// ## Behavior
/// - `staff_id` defaults to the configured staff id
/// - An unfinished order is discarded (not stored) and reported back
pub fn start_order(
    orders: &OrderState,
    config: &ConfigState,
    staff_id: Option<&str>,
) -> Result<StartResponse, ApiError> {
    let staff_id = staff_id.unwrap_or(&config.staff_id);
    debug!(staff_id = %staff_id, "start_order command");

    orders.with_engine_mut(|engine| {
        let discarded = match engine.start_new_order(staff_id)? {
            StartOutcome::Started => None,
            StartOutcome::DiscardedPending(order) => {
                warn!(
                    order_id = %order.id,
                    items = order.item_count(),
                    "Unfinished order discarded"
                );
                Some(OrderSnapshot::from(&order))
            }
        };

        let order = engine
            .snapshot()
            .ok_or_else(|| ApiError::internal("No order after start"))?;
        info!(order_id = %order.order_id, staff_id = %staff_id, "Order started");

        Ok::<_, ApiError>(StartResponse {
            order,
            discarded,
            notices: engine.drain_notices(),
        })
    })
}

/// Adds a catalog product to the current order.
///
/// ## Behavior
/// - Adding a product already on the order merges into its line
/// - Price and tax rate are captured from the catalog at this moment
pub fn add_item(
    orders: &OrderState,
    catalog: &CatalogState,
    product_id: &str,
    quantity: i64,
    notes: Option<String>,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "add_item command");

    let product = catalog
        .inner()
        .get_product(product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    orders.with_engine_mut(|engine| {
        engine.add_item_to_order(product, quantity, notes)?;
        Ok::<_, ApiError>(OrderResponse {
            order: engine.snapshot(),
            notices: engine.drain_notices(),
        })
    })
}

/// Sets the quantity of a line. Anything below 1 removes the line.
///
/// `item_key` is a line id or a unique prefix of one.
pub fn update_quantity(
    orders: &OrderState,
    item_key: &str,
    quantity: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(item = %item_key, quantity = %quantity, "update_quantity command");

    orders.with_engine_mut(|engine| {
        let item_id = engine
            .current_order()
            .ok_or(CoreError::NoActiveOrder)?
            .resolve_item_id(item_key)
            .map(str::to_string)
            .ok_or_else(|| CoreError::ItemNotFound(item_key.to_string()))?;

        engine.update_item_quantity(&item_id, quantity)?;
        Ok::<_, ApiError>(OrderResponse {
            order: engine.snapshot(),
            notices: engine.drain_notices(),
        })
    })
}

/// Removes a line. An unknown line is a no-op.
pub fn remove_item(orders: &OrderState, item_key: &str) -> Result<RemoveResponse, ApiError> {
    debug!(item = %item_key, "remove_item command");

    orders.with_engine_mut(|engine| {
        let item_id = engine
            .current_order()
            .ok_or(CoreError::NoActiveOrder)?
            .resolve_item_id(item_key)
            .unwrap_or(item_key)
            .to_string();

        let removed = engine.remove_item_from_order(&item_id)?;
        Ok::<_, ApiError>(RemoveResponse {
            removed,
            order: engine.snapshot(),
            notices: engine.drain_notices(),
        })
    })
}

/// Replaces the order discount.
pub fn apply_discount(orders: &OrderState, amount: Money) -> Result<OrderResponse, ApiError> {
    debug!(amount = %amount, "apply_discount command");

    orders.with_engine_mut(|engine| {
        engine.apply_discount(amount)?;
        Ok::<_, ApiError>(OrderResponse {
            order: engine.snapshot(),
            notices: engine.drain_notices(),
        })
    })
}

/// Pays for the current order.
///
/// ## Checkout Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. engine.complete_order(method, customer)      (lock held)            │
/// │       └── fails? nothing changed, error returned                       │
/// │  2. drain notices, release the lock                                     │
/// │  3. db.orders().prepend(order)                   (await)                │
/// │       └── fails? warn!, persisted = false, checkout still succeeds     │
/// │  4. build the receipt link                                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn complete_order(
    orders: &OrderState,
    db: &DbState,
    config: &ConfigState,
    payment_method: PaymentMethod,
    customer: Option<CustomerInfo>,
) -> Result<CheckoutResponse, ApiError> {
    debug!(method = %payment_method, with_customer = customer.is_some(), "complete_order command");

    let (completion, notices) = orders.with_engine_mut(|engine| {
        let completion = engine.complete_order(payment_method, customer)?;
        Ok::<_, ApiError>((completion, engine.drain_notices()))
    })?;
    let order = completion.order;

    let persisted = match db.inner().orders().prepend(&order).await {
        Ok(stored) => {
            debug!(order_id = %order.id, stored, "Order saved to history");
            true
        }
        Err(e) => {
            warn!(order_id = %order.id, error = %e, "Failed to save completed order");
            false
        }
    };

    let receipt_url = config.receipts.generate(&completion.receipt);

    info!(
        order_id = %order.id,
        total = %order.total,
        method = %payment_method,
        items = order.item_count(),
        persisted,
        "Order completed"
    );

    Ok(CheckoutResponse {
        order,
        receipt_url,
        persisted,
        notices,
    })
}

/// Drops the current order without storing it.
pub fn cancel_order(orders: &OrderState) -> CancelResponse {
    debug!("cancel_order command");

    orders.with_engine_mut(|engine| {
        let canceled = engine.cancel_order();
        if let Some(order) = &canceled {
            info!(order_id = %order.id, items = order.item_count(), "Order canceled");
        }
        CancelResponse {
            canceled,
            notices: engine.drain_notices(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::catalog::demo_products;
    use flow_core::{NoticeLevel, OrderStatus};
    use flow_db::{Database, DbConfig};

    use crate::error::ErrorCode;

    struct Fixture {
        orders: OrderState,
        catalog: CatalogState,
        db: DbState,
        config: ConfigState,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Fixture {
            orders: OrderState::new(),
            catalog: CatalogState::new(demo_products()),
            db: DbState::new(db),
            config: ConfigState::from_lookup(|_| None).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_checkout_persists_and_links_receipt() {
        let f = fixture().await;

        start_order(&f.orders, &f.config, None).unwrap();
        add_item(&f.orders, &f.catalog, "p1", 2, None).unwrap();
        let discounted = apply_discount(&f.orders, Money::from_cents(100)).unwrap();
        assert_eq!(discounted.order.unwrap().total, Money::from_cents(738));

        let checkout = complete_order(
            &f.orders,
            &f.db,
            &f.config,
            PaymentMethod::Cash,
            Some(CustomerInfo::new("Jane", "555-1234")),
        )
        .await
        .unwrap();

        assert!(checkout.persisted);
        assert_eq!(checkout.order.status, OrderStatus::Completed);
        assert_eq!(checkout.order.created_by, "u1");
        assert!(checkout
            .receipt_url
            .starts_with("https://yourapp.com/receipts/receipt-"));
        assert!(checkout.receipt_url.contains("customer=Jane"));
        assert!(checkout.receipt_url.contains("total=7.38"));
        assert_eq!(
            checkout.notices,
            vec![Notice::success("Order completed successfully!")]
        );

        let stored = f.db.inner().orders().load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, checkout.order.id);
        assert!(get_order(&f.orders).order.is_none());
    }

    #[tokio::test]
    async fn test_checkout_survives_storage_failure() {
        let f = fixture().await;
        f.db.inner().close().await;

        start_order(&f.orders, &f.config, Some("u2")).unwrap();
        add_item(&f.orders, &f.catalog, "p4", 1, None).unwrap();

        let checkout = complete_order(&f.orders, &f.db, &f.config, PaymentMethod::Card, None)
            .await
            .unwrap();

        assert!(!checkout.persisted);
        assert_eq!(checkout.order.created_by, "u2");
        assert!(checkout.receipt_url.contains("customer=Walk-in"));
        f.orders.with_engine(|engine| {
            assert!(engine.current_order().is_none());
            assert_eq!(engine.history().len(), 1);
        });
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_order() {
        let f = fixture().await;
        start_order(&f.orders, &f.config, None).unwrap();

        let err = complete_order(&f.orders, &f.db, &f.config, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);
        assert!(get_order(&f.orders).order.is_some());
        assert_eq!(f.db.inner().orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_start_reports_discarded_order() {
        let f = fixture().await;
        start_order(&f.orders, &f.config, None).unwrap();
        add_item(&f.orders, &f.catalog, "p2", 1, None).unwrap();

        let restarted = start_order(&f.orders, &f.config, None).unwrap();
        let discarded = restarted.discarded.unwrap();
        assert_eq!(discarded.item_count, 1);
        assert!(restarted.order.items.is_empty());
        assert_eq!(restarted.notices[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let f = fixture().await;
        start_order(&f.orders, &f.config, None).unwrap();

        let err = add_item(&f.orders, &f.catalog, "p9", 1, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No product with id 'p9'");
    }

    #[tokio::test]
    async fn test_quantity_and_remove_by_prefix() {
        let f = fixture().await;
        start_order(&f.orders, &f.config, None).unwrap();
        let added = add_item(&f.orders, &f.catalog, "p3", 1, Some("no onions".into())).unwrap();
        let item_id = added.order.unwrap().items[0].id.clone();
        let prefix = &item_id[..8];

        let updated = update_quantity(&f.orders, prefix, 3).unwrap();
        assert_eq!(updated.order.unwrap().items[0].quantity, 3);

        let missing = update_quantity(&f.orders, "zzzz", 2).unwrap_err();
        assert_eq!(missing.code, ErrorCode::NotFound);

        let noop = remove_item(&f.orders, "zzzz").unwrap();
        assert!(noop.removed.is_none());
        assert!(noop.notices.is_empty());

        let removed = remove_item(&f.orders, prefix).unwrap();
        assert_eq!(removed.removed.unwrap().id, item_id);
        assert!(removed.order.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_commands_without_order() {
        let f = fixture().await;

        let err = add_item(&f.orders, &f.catalog, "p1", 1, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);

        let err = apply_discount(&f.orders, Money::from_cents(100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderError);

        let canceled = cancel_order(&f.orders);
        assert!(canceled.canceled.is_none());
    }

    #[tokio::test]
    async fn test_cancel_stores_nothing() {
        let f = fixture().await;
        start_order(&f.orders, &f.config, None).unwrap();
        add_item(&f.orders, &f.catalog, "p1", 1, None).unwrap();
        add_item(&f.orders, &f.catalog, "p5", 1, None).unwrap();

        let canceled = cancel_order(&f.orders);
        assert_eq!(canceled.canceled.unwrap().status, OrderStatus::Canceled);
        assert_eq!(canceled.notices, vec![Notice::info("Order canceled")]);
        assert_eq!(f.db.inner().orders().count().await.unwrap(), 0);
    }
}
