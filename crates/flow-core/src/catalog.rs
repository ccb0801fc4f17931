//! # Catalog Lookup
//!
//! Resolves product ids to product records for the order engine.
//!
//! The engine never touches the catalog directly; the caller looks the
//! product up and hands the engine a reference. [`CatalogLookup`] is the
//! seam, [`Catalog`] the in-memory implementation the terminal builds from
//! stored products.

use crate::types::Product;

// =============================================================================
// Lookup Trait
// =============================================================================

/// Read-only product lookup by id.
pub trait CatalogLookup {
    fn get_product(&self, id: &str) -> Option<&Product>;
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Insertion-ordered product list.
///
/// Catalogs are small (dozens of products), so lookup is a linear scan and
/// listing keeps the order the products were stored in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive name search.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect()
    }
}

impl CatalogLookup for Catalog {
    fn get_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

// =============================================================================
// Demo Data
// =============================================================================

fn demo(
    id: &str,
    name: &str,
    category_id: &str,
    price_cents: i64,
    tax_pct: u32,
    stock: i64,
    reorder_level: i64,
) -> Product {
    let mut product = Product::new(id, name, price_cents, tax_pct * 100).with_discounted_price(0);
    product.category_id = category_id.to_string();
    product.stock = stock;
    product.reorder_level = reorder_level;
    product
}

/// The demo catalog a fresh install starts with.
///
/// | id | name                    | price | discounted | tax |
/// |----|-------------------------|-------|------------|-----|
/// | p1 | Coffee - Americano      | 3.99  | -          | 5%  |
/// | p2 | Tea - English Breakfast | 2.99  | -          | 5%  |
/// | p3 | Sandwich - Veggie       | 5.99  | 4.99       | 5%  |
/// | p4 | Croissant               | 2.49  | -          | 5%  |
/// | p5 | Room Cleaning (service) | 15.00 | -          | 18% |
pub fn demo_products() -> Vec<Product> {
    let mut sandwich = demo("p3", "Sandwich - Veggie", "c2", 599, 5, 20, 5);
    sandwich.discounted_price_cents = Some(499);

    let mut cleaning = demo("p5", "Room Cleaning", "c3", 1500, 18, 999, 0);
    cleaning.is_service = true;

    vec![
        demo("p1", "Coffee - Americano", "c1", 399, 5, 100, 20),
        demo("p2", "Tea - English Breakfast", "c1", 299, 5, 80, 15),
        sandwich,
        demo("p4", "Croissant", "c2", 249, 5, 15, 5),
        cleaning,
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
