//! # Catalog Repository
//!
//! Product records, stored as one JSON array under `pos_products` in
//! catalog order.

use flow_core::validation::validate_product;
use flow_core::{Product, PRODUCTS_STORAGE_KEY};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::storage::{get_item_tx, set_item_tx, LocalStorage};

/// Repository for the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// All stored products in catalog order.
    pub async fn load_all(&self) -> DbResult<Vec<Product>> {
        let products: Option<Vec<Product>> = LocalStorage::new(self.pool.clone())
            .get_json(PRODUCTS_STORAGE_KEY)
            .await?;
        Ok(products.unwrap_or_default())
    }

    /// Loads the catalog, writing `defaults` first when nothing is stored.
    pub async fn load_or_init(&self, defaults: Vec<Product>) -> DbResult<Vec<Product>> {
        let existing = self.load_all().await?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        info!(count = defaults.len(), "Catalog empty, storing default products");
        self.save_all(&defaults).await?;
        Ok(defaults)
    }

    /// Replaces the whole catalog.
    pub async fn save_all(&self, products: &[Product]) -> DbResult<()> {
        for product in products {
            check(product)?;
        }

        LocalStorage::new(self.pool.clone())
            .set_json(PRODUCTS_STORAGE_KEY, products)
            .await?;

        debug!(count = products.len(), "Catalog saved");
        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        self.load_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("product", id))
    }

    /// Inserts a product, or replaces the stored product with the same id
    /// in place.
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        check(product)?;

        let mut tx = self.pool.begin().await?;

        let mut products: Vec<Product> = match get_item_tx(&mut tx, PRODUCTS_STORAGE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }

        let raw = serde_json::to_string(&products)?;
        set_item_tx(&mut tx, PRODUCTS_STORAGE_KEY, &raw).await?;
        tx.commit().await?;

        debug!(product_id = %product.id, "Product upserted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<usize> {
        Ok(self.load_all().await?.len())
    }
}

fn check(product: &Product) -> DbResult<()> {
    validate_product(product)
        .map_err(|e| DbError::InvalidRecord(format!("product {}: {}", product.id, e)))
}

// =============================================================================
// Unit Tests
// =============================================================================
