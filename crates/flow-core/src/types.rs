//! # Domain Types
//!
//! Core domain types used throughout Flow POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   OrderStatus   │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Pending        │   │  Cash   Card    │       │
//! │  │  price_cents    │   │  Completed      │   │  Upi    Wallet  │       │
//! │  │  discounted_*   │   │  Canceled       │   │  Split          │       │
//! │  │  tax_rate_bps   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  CustomerInfo   │   │     Notice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  name           │   │  level          │       │
//! │  │  500 = 5%       │   │  phone          │   │  message        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order and line item types live in [`crate::order`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5%, 1800 bps = 18%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `500` → `"5%"`, `825` → `"8.25%"`.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product (or service) available for sale.
///
/// Read-only to the order engine. Stock, reorder level and the business
/// identifiers travel with the record for catalog persistence; none of them
/// take part in order totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    #[serde(default)]
    pub category_id: String,

    /// Base price in cents.
    pub price_cents: i64,

    /// Promotional price in cents. Zero counts as "no discount".
    #[serde(default)]
    pub discounted_price_cents: Option<i64>,

    /// Tax rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,

    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub reorder_level: i64,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub barcode: Option<String>,

    /// Services (room cleaning, ...) have no physical stock.
    #[serde(default)]
    pub is_service: bool,
}

impl Product {
    /// Creates a plain goods product with no promotional price.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        tax_rate_bps: u32,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category_id: String::new(),
            price_cents,
            discounted_price_cents: None,
            tax_rate_bps,
            stock: 0,
            reorder_level: 0,
            sku: None,
            barcode: None,
            is_service: false,
        }
    }

    /// Sets the promotional price.
    pub fn with_discounted_price(mut self, cents: i64) -> Self {
        self.discounted_price_cents = Some(cents);
        self
    }

    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// The unit price a sale actually charges.
    ///
    /// The discounted price wins when it is present and non-zero; a stored
    /// `0` means the promotion is off.
    ///
    /// ```rust
    /// use flow_core::types::Product;
    ///
    /// let sandwich = Product::new("p3", "Sandwich", 599, 500).with_discounted_price(499);
    /// assert_eq!(sandwich.charged_price().cents(), 499);
    ///
    /// let coffee = Product::new("p1", "Coffee", 399, 500).with_discounted_price(0);
    /// assert_eq!(coffee.charged_price().cents(), 399);
    /// ```
    pub fn charged_price(&self) -> Money {
        match self.discounted_price_cents {
            Some(cents) if cents > 0 => Money::from_cents(cents),
            _ => self.price(),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
///
/// ```text
///            start
///              │
///              ▼
///        ┌───────────┐   complete   ┌───────────┐
///        │  Pending  │ ───────────► │ Completed │ ──► history
///        └─────┬─────┘              └───────────┘
///              │ cancel
///              ▼
///        ┌───────────┐
///        │ Canceled  │ ──► dropped
///        └───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Items are being added.
    Pending,
    /// Paid and immutable.
    Completed,
    /// Abandoned; never persisted.
    Canceled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Recorded only; no payment is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Wallet,
    /// Part cash, part card (or any mix); only the label is recorded.
    Split,
}

impl PaymentMethod {
    /// Every method, in the order the payment screen lists them.
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::Wallet,
        PaymentMethod::Split,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Split => "split",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Customer Info
// =============================================================================

/// Optional customer details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        CustomerInfo {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

// =============================================================================
// Notices
// =============================================================================

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// A transient message for the operator ("Added: Croissant").
///
/// The engine queues these; the UI drains and shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(500).to_string(), "5%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(750).to_string(), "7.5%");
        assert_eq!(TaxRate::zero().to_string(), "0%");
    }

    #[test]
    fn test_charged_price_prefers_nonzero_discount() {
        let p = Product::new("p", "P", 599, 500);
        assert_eq!(p.charged_price().cents(), 599);

        let p = p.with_discounted_price(499);
        assert_eq!(p.charged_price().cents(), 499);

        let p = Product::new("p", "P", 399, 500).with_discounted_price(0);
        assert_eq!(p.charged_price().cents(), 399);
    }

    #[test]
    fn test_product_json_is_camel_case() {
        let p = Product::new("p1", "Coffee", 399, 500);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["priceCents"], 399);
        assert_eq!(json["taxRateBps"], 500);
        assert_eq!(json["isService"], false);
    }

    #[test]
    fn test_product_json_missing_optional_fields() {
        let p: Product = serde_json::from_str(
            r#"{"id":"x","name":"X","priceCents":100,"taxRateBps":0}"#,
        )
        .unwrap();
        assert_eq!(p.discounted_price_cents, None);
        assert!(!p.is_service);
    }

    #[test]
    fn test_order_status_default_and_serde() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Canceled).unwrap(),
            "\"canceled\""
        );
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("UPI".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!(" split ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Split);

        let err = "cheque".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_payment_method_round_trips_through_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }
}
