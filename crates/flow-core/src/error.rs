//! # Engine Errors
//!
//! [`CoreError`] is what an order operation can refuse with.
//! [`ValidationError`] describes a single bad field and converts into
//! `CoreError::Validation`, so validators compose with `?` inside the engine.
//!
//! Neither type knows about storage; `flow-db` has its own `DbError` and the
//! terminal maps both onto an operator-facing error code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No product with id '{0}'")]
    ProductNotFound(String),

    /// Raised by every mutation when nothing is pending: before the first
    /// `start`, after payment, after cancel.
    #[error("No active order; start a new order first")]
    NoActiveOrder,

    #[error("No order line matching '{0}'")]
    ItemNotFound(String),

    #[error("Cannot complete an order with no items")]
    EmptyOrder,

    #[error("Quantity must be at least 1, got {requested}")]
    InvalidQuantity { requested: i64 },

    #[error("Quantity {requested} is above the limit of {max}")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A unit price or line total too large to compute with.
    #[error("Amount out of range for {product_id}")]
    AmountOutOfRange { product_id: String },

    #[error("An order holds at most {max} lines")]
    OrderTooLarge { max: usize },

    /// Negative, or larger than subtotal plus tax.
    #[error("Invalid discount: {reason}")]
    InvalidDiscount { reason: String },

    #[error("Order {order_id} is already {current_status}")]
    InvalidOrderStatus {
        order_id: String,
        current_status: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Field validation
// =============================================================================

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} needs at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} allows at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Text that could not be parsed, such as an amount or a URL.
    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_facing_messages() {
        assert_eq!(
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: 999
            }
            .to_string(),
            "Quantity 1000 is above the limit of 999"
        );
        assert_eq!(
            CoreError::InvalidOrderStatus {
                order_id: "o-1".to_string(),
                current_status: "completed".to_string(),
            }
            .to_string(),
            "Order o-1 is already completed"
        );
        assert_eq!(
            ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["cash".to_string(), "card".to_string()],
            }
            .to_string(),
            "payment method must be one of: cash, card"
        );
    }

    #[test]
    fn test_validation_error_keeps_its_message_inside_core_error() {
        let core: CoreError = ValidationError::TooShort {
            field: "phone".to_string(),
            min: 6,
        }
        .into();

        assert!(matches!(core, CoreError::Validation(_)));
        assert_eq!(core.to_string(), "phone needs at least 6 characters");
    }
}
