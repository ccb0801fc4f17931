//! # Product Commands
//!
//! Catalog listing and lookup. The catalog is loaded once at startup, so
//! these never touch the database.

use flow_core::catalog::CatalogLookup;
use flow_core::Product;
use tracing::debug;

use crate::error::ApiError;
use crate::state::CatalogState;

/// Lists products in catalog order, optionally filtered by a
/// case-insensitive name query.
pub fn list_products(catalog: &CatalogState, query: Option<&str>) -> Vec<Product> {
    debug!(query = ?query, "list_products command");

    let catalog = catalog.inner();
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => catalog.search(q).into_iter().cloned().collect(),
        None => catalog.list().to_vec(),
    }
}

/// Gets a single product by id.
pub fn get_product(catalog: &CatalogState, id: &str) -> Result<Product, ApiError> {
    debug!(id = %id, "get_product command");

    catalog
        .inner()
        .get_product(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("product", id))
}
