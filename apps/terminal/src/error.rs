//! # Command Errors
//!
//! Every command returns `Result<_, ApiError>`. The REPL prints a failure as
//! one line and keeps the session going:
//!
//! ```text
//! flow> add p9
//! ✗ [NOT_FOUND] No product with id 'p9'
//! ```
//!
//! Engine and config errors pass their message through unchanged. Storage
//! errors are logged in full and shown to the operator as a short summary.
//! The struct serializes as `{ "code": "NOT_FOUND", "message": ... }` for
//! front ends that want the code rather than the text.

use std::fmt;

use flow_core::CoreError;
use flow_db::DbError;
use serde::Serialize;
use tracing::error;

use crate::state::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product, order line or stored order.
    NotFound,
    ValidationError,
    DatabaseError,
    /// Nothing pending, or the order cannot take this operation.
    OrderError,
    /// Discount rejected.
    PaymentError,
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::OrderError => "ORDER_ERROR",
            ErrorCode::PaymentError => "PAYMENT_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("No {} with id '{}'", entity, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn storage(summary: &str, detail: &DbError) -> Self {
        error!(error = %detail, "{}", summary);
        ApiError::new(ErrorCode::DatabaseError, summary)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { entity, id } => ApiError::not_found(entity, id),
            DbError::InvalidRecord(reason) => ApiError::validation(reason.clone()),
            DbError::Unavailable(_) => ApiError::storage("Local storage is unavailable", &err),
            DbError::Migration(_) => ApiError::storage("Local storage schema is out of date", &err),
            DbError::Sqlite(_) => ApiError::storage("Local storage operation failed", &err),
            DbError::Serialization(_) => ApiError::storage("Stored data is unreadable", &err),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::ItemNotFound(_) => ErrorCode::NotFound,
            CoreError::NoActiveOrder
            | CoreError::EmptyOrder
            | CoreError::OrderTooLarge { .. }
            | CoreError::InvalidOrderStatus { .. } => ErrorCode::OrderError,
            CoreError::InvalidDiscount { .. } => ErrorCode::PaymentError,
            CoreError::InvalidQuantity { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::AmountOutOfRange { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
