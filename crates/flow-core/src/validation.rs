//! # Validation Module
//!
//! Input validation for Flow POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal command parsing (clap)                              │
//! │  ├── Type validation (integers, payment methods, amounts)              │
//! │  └── Immediate feedback on the prompt                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order engine (flow-core)                                     │
//! │  ├── THIS MODULE: Business rule validation                             │
//! │  └── Lifecycle checks (pending order, non-empty, discount bounds)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage (flow-db)                                            │
//! │  └── Only completed orders and valid products are written              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use flow_core::validation::{validate_customer, validate_creator_id};
//! use flow_core::CustomerInfo;
//!
//! validate_creator_id("u1").unwrap();
//! validate_customer(&CustomerInfo::new("Jane", "555-1234")).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{CustomerInfo, Product};
use crate::MAX_PRICE_CENTS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest phone number the checkout form accepts.
pub const MIN_PHONE_LEN: usize = 6;

const MAX_NAME_LEN: usize = 200;
const MAX_NOTES_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the staff id that opens an order.
///
/// ## Example
/// ```rust
/// use flow_core::validation::validate_creator_id;
///
/// assert!(validate_creator_id("u1").is_ok());
/// assert!(validate_creator_id("   ").is_err());
/// ```
pub fn validate_creator_id(creator_id: &str) -> ValidationResult<()> {
    if creator_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "created_by".to_string(),
        });
    }

    Ok(())
}

/// Validates customer details captured at checkout.
///
/// ## Rules
/// - Name must not be empty (at most 200 characters)
/// - Phone must have at least 6 characters
pub fn validate_customer(customer: &CustomerInfo) -> ValidationResult<()> {
    let name = customer.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if customer.phone.trim().chars().count() < MIN_PHONE_LEN {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: MIN_PHONE_LEN,
        });
    }

    Ok(())
}

/// Validates free-text line notes ("no sugar").
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use flow_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coffee - Americano").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents.
///
/// ## Rules
/// - Zero is allowed (free items)
/// - At most [`MAX_PRICE_CENTS`], so order totals cannot overflow
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a catalog record before it is stored.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    validate_product_name(&product.name)?;
    validate_price_cents("price", product.price_cents)?;
    if let Some(cents) = product.discounted_price_cents {
        validate_price_cents("discounted price", cents)?;
    }
    validate_tax_rate_bps(product.tax_rate_bps)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
