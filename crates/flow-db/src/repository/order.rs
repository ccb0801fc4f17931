//! # Order History Repository
//!
//! Completed orders, stored as one JSON array under `pos_orders`, most
//! recent first.
//!
//! ## Checkout Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  complete_order (terminal command)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HistoryRepository::prepend(order)                                      │
//! │       │                                                                 │
//! │       │   BEGIN                                                         │
//! │       ├── SELECT value WHERE key = 'pos_orders'   → [B, A]              │
//! │       ├── insert at front                         → [C, B, A]           │
//! │       ├── UPSERT value                                                  │
//! │       │   COMMIT                                                        │
//! │       ▼                                                                 │
//! │  Ok(3)                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A document that no longer parses is never overwritten: `prepend` fails
//! with [`DbError::Serialization`] and the stored bytes stay as they were.

use flow_core::{Order, OrderStatus, ORDERS_STORAGE_KEY};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::storage::{get_item_tx, set_item_tx, LocalStorage};

/// Repository for the completed order history.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.pool.clone())
    }

    /// All stored orders, most recent first. Timestamps come back parsed.
    pub async fn load(&self) -> DbResult<Vec<Order>> {
        let orders: Option<Vec<Order>> = self.storage().get_json(ORDERS_STORAGE_KEY).await?;
        Ok(orders.unwrap_or_default())
    }

    /// Puts a completed order at the front of the history.
    ///
    /// ## Returns
    /// The number of stored orders afterwards.
    pub async fn prepend(&self, order: &Order) -> DbResult<usize> {
        if order.status != OrderStatus::Completed {
            return Err(DbError::InvalidRecord(format!(
                "order {} is {}, only completed orders are stored",
                order.id, order.status
            )));
        }

        let mut tx = self.pool.begin().await?;

        let mut orders: Vec<Order> = match get_item_tx(&mut tx, ORDERS_STORAGE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        orders.insert(0, order.clone());

        let raw = serde_json::to_string(&orders)?;
        set_item_tx(&mut tx, ORDERS_STORAGE_KEY, &raw).await?;
        tx.commit().await?;

        debug!(order_id = %order.id, stored = orders.len(), "Order appended to history");
        Ok(orders.len())
    }

    /// Number of stored orders.
    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.load().await?.len())
    }

    /// Looks up one stored order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        self.load()
            .await?
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| DbError::not_found("order", id))
    }

    /// Deletes the whole history. Returns whether there was anything stored.
    pub async fn clear(&self) -> DbResult<bool> {
        let removed = self.storage().remove_item(ORDERS_STORAGE_KEY).await?;
        info!(removed, "Order history cleared");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use flow_core::catalog::{demo_products, Catalog, CatalogLookup};
    use flow_core::engine::OrderEngine;
    use flow_core::{Money, PaymentMethod};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn completed(product_id: &str, method: PaymentMethod) -> Order {
        let catalog = Catalog::new(demo_products());
        let mut engine = OrderEngine::new();
        engine.start_new_order("u1").unwrap();
        engine
            .add_item_to_order(catalog.get_product(product_id).unwrap(), 2, None)
            .unwrap();
        engine.complete_order(method, None).unwrap().order
    }

    #[tokio::test]
    async fn test_empty_history() {
        let db = db().await;
        assert!(db.orders().load().await.unwrap().is_empty());
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_prepend_keeps_most_recent_first() {
        let db = db().await;
        let a = completed("p1", PaymentMethod::Cash);
        let b = completed("p2", PaymentMethod::Card);

        assert_eq!(db.orders().prepend(&a).await.unwrap(), 1);
        assert_eq!(db.orders().prepend(&b).await.unwrap(), 2);

        let stored = db.orders().load().await.unwrap();
        assert_eq!(stored[0].id, b.id);
        assert_eq!(stored[1].id, a.id);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_record() {
        let db = db().await;
        let order = completed("p1", PaymentMethod::Upi);
        db.orders().prepend(&order).await.unwrap();

        let stored = db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(stored, order);
        assert_eq!(stored.created_at, order.created_at);
        assert_eq!(stored.total, Money::from_cents(838));
    }

    #[tokio::test]
    async fn test_reads_iso_timestamps_written_elsewhere() {
        let db = db().await;
        let raw = r#"[{
            "id": "o-1",
            "items": [],
            "subtotal": 0, "tax": 0, "discount": 0, "total": 0,
            "status": "completed",
            "paymentMethod": "cash",
            "createdAt": "2024-05-01T10:15:30.000Z",
            "createdBy": "u1"
        }]"#;
        db.storage().set_item(ORDERS_STORAGE_KEY, raw).await.unwrap();

        let stored = db.orders().load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].created_at.to_rfc3339(), "2024-05-01T10:15:30+00:00");
        assert_eq!(stored[0].completed_at, None);
    }

    #[tokio::test]
    async fn test_refuses_pending_orders() {
        let db = db().await;
        let pending = Order::new("u1");

        let err = db.orders().prepend(&pending).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidRecord(_)));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_history_is_not_overwritten() {
        let db = db().await;
        db.storage().set_item(ORDERS_STORAGE_KEY, "not json").await.unwrap();

        let err = db
            .orders()
            .prepend(&completed("p1", PaymentMethod::Cash))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
        assert_eq!(
            db.storage().get_item(ORDERS_STORAGE_KEY).await.unwrap().as_deref(),
            Some("not json")
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let db = db().await;
        db.orders().prepend(&completed("p1", PaymentMethod::Cash)).await.unwrap();

        assert!(db.orders().clear().await.unwrap());
        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert!(!db.orders().clear().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let db = db().await;
        let err = db.orders().get_by_id("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
