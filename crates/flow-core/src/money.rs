//! # Money
//!
//! Every amount in an order is an integer count of cents. Prices, line
//! totals, tax and discounts are added and multiplied exactly; the only
//! rounding step is per-line tax, which rounds half up to the cent.
//!
//! ```text
//!   2 × 3.99 at 5%   →   798 cents × 500 bps = 39.9   →   40 cents
//! ```
//!
//! Operator input arrives as decimal text and is parsed straight into cents:
//!
//! ```rust
//! use flow_core::money::Money;
//!
//! let line = Money::from_cents(399) * 2;
//! assert_eq!(line.to_string(), "7.98");
//!
//! let discount: Money = "1.00".parse().unwrap();
//! assert_eq!(discount.cents(), 100);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in cents. Signed, because a discount can outlive the lines it
/// was granted against. Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `self × qty`, or `None` when the result does not fit.
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Tax owed on this amount, rounded half up to the cent.
    ///
    /// ```rust
    /// use flow_core::money::Money;
    /// use flow_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(798).calculate_tax(TaxRate::from_bps(500));
    /// assert_eq!(tax.cents(), 40);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let scaled = i128::from(self.0) * i128::from(rate.bps()) + 5000;
        Money(scaled.div_euclid(10_000) as i64)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text such as `"3.99"`, `"12"`, `".5"` or `"-1.5"`.
///
/// At most two fractional digits are accepted; anything finer than a cent
/// is an input error rather than something to round silently.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty() && minor.is_empty() {
            return Err(invalid("expected a number like 12.34"));
        }
        if !major.chars().all(|c| c.is_ascii_digit()) || !minor.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a number like 12.34"));
        }
        if minor.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => minor.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`"-5.50"`). The currency code or symbol is
/// prefixed by the configuration layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
