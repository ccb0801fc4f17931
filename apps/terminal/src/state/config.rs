//! # Configuration State
//!
//! Business settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FLOW_*`)
//! 2. Defaults (this file)
//!
//! | Variable                | Default               |
//! |-------------------------|-----------------------|
//! | `FLOW_STORE_NAME`       | `Flow POS Nexus`      |
//! | `FLOW_CURRENCY`         | `USD`                 |
//! | `FLOW_STAFF_ID`         | `u1`                  |
//! | `FLOW_RECEIPT_BASE_URL` | `https://yourapp.com` |
//!
//! Configuration is read-only after initialization, so no lock is needed.

use flow_core::receipt::LinkReceiptGenerator;
use flow_core::Money;
use thiserror::Error;

pub const DEFAULT_STORE_NAME: &str = "Flow POS Nexus";
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_STAFF_ID: &str = "u1";
pub const DEFAULT_RECEIPT_BASE_URL: &str = "https://yourapp.com";

/// An environment value that cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{key}: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &str, reason: impl Into<String>) -> Self {
        ConfigError {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// Shown in the banner and on receipts
    pub store_name: String,

    /// ISO 4217 code, prefixed to every amount ("USD 7.38")
    pub currency_code: String,

    /// Staff id new orders are created by unless `start` names another
    pub staff_id: String,

    /// Builds shareable receipt links under the configured base URL
    pub receipts: LinkReceiptGenerator,
}

impl ConfigState {
    /// Reads `FLOW_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset and blank keys
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let currency_code = get("FLOW_CURRENCY", DEFAULT_CURRENCY).to_uppercase();
        if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::new(
                "FLOW_CURRENCY",
                format!("expected a three-letter currency code, got '{}'", currency_code),
            ));
        }

        let receipt_base_url = get("FLOW_RECEIPT_BASE_URL", DEFAULT_RECEIPT_BASE_URL);
        let receipts = LinkReceiptGenerator::new(&receipt_base_url)
            .map_err(|e| ConfigError::new("FLOW_RECEIPT_BASE_URL", e.to_string()))?;

        Ok(ConfigState {
            store_name: get("FLOW_STORE_NAME", DEFAULT_STORE_NAME),
            currency_code,
            staff_id: get("FLOW_STAFF_ID", DEFAULT_STAFF_ID),
            receipts,
        })
    }

    /// Formats an amount the way the business displays it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::from_lookup(|_| None)?;
    /// assert_eq!(config.format_currency(Money::from_cents(738)), "USD 7.38");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.currency_code, amount)
    }
}
