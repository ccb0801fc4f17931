//! # Catalog State
//!
//! The product catalog, loaded from storage once at startup and read-only
//! afterwards.

use std::sync::Arc;

use flow_core::catalog::Catalog;
use flow_core::Product;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    catalog: Arc<Catalog>,
}

impl CatalogState {
    pub fn new(products: Vec<Product>) -> Self {
        CatalogState {
            catalog: Arc::new(Catalog::new(products)),
        }
    }

    /// Returns a reference to the inner Catalog.
    pub fn inner(&self) -> &Catalog {
        &self.catalog
    }
}
