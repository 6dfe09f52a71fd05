//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER CENTS PROBLEM                                              │
//! │    YER rate is 1/530 per USD. 10.00 SAR → 1431.13207... YER            │
//! │    Cents would truncate on every conversion and every pipeline step    │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals                                   │
//! │    Amounts stay exact through subtotal → discount → tax → total        │
//! │    Rounding to 2 places happens ONLY at display time                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::money::Money;
//!
//! let price = Money::from_minor(1099); // 10.99
//! let doubled = price * 2;             // 21.98
//! let total = price + Money::from_minor(500);
//! assert_eq!(total.to_string(), "15.99");
//! assert_eq!(doubled, Money::from_minor(2198));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Decimal places used when an amount is shown to a person.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount, exact to the last decimal digit.
///
/// Money carries no currency: canonical amounts are in the base currency and
/// the currency ledger decides what a display amount means.
///
/// ## Where Money is Used
/// ```text
/// Product.price (canonical) ──┬──► CartItem snapshot ──► line total
///                             │
///                             └──► Ledger::to_display ──► catalog listing
///
/// Cart ──► subtotal ──► discount ──► tax ──► total ──► Invoice
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from minor units (hundredths).
    ///
    /// ## Example
    /// ```rust
    /// use cashier_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, DISPLAY_DECIMALS))
    }

    /// Creates a Money value from a whole number of major units.
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies money by a line quantity, saturating at the `Decimal`
    /// range instead of panicking.
    ///
    /// ## Example
    /// ```rust
    /// use cashier_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_minor(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Returns `pct` percent of this amount, unrounded. Saturates like
    /// [`Money::multiply_quantity`].
    ///
    /// ```rust
    /// use cashier_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major(90);
    /// assert_eq!(subtotal.percent(Decimal::from(15)), Money::from_minor(1350));
    /// ```
    pub fn percent(&self, pct: Decimal) -> Money {
        Money(self.0.saturating_mul(pct) / Decimal::ONE_HUNDRED)
    }

    /// Calculates tax at a flat rate, exactly.
    ///
    /// ## Formula
    /// `amount × bps / 10000`, no intermediate rounding. The pipeline rounds
    /// once, when the result is displayed.
    ///
    /// ```rust
    /// use cashier_core::money::Money;
    /// use cashier_core::types::TaxRate;
    ///
    /// let base = Money::from_major(90);
    /// let tax = base.calculate_tax(TaxRate::from_percentage(15));
    /// assert_eq!(tax, Money::from_minor(1350));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0.saturating_mul(Decimal::from(rate.bps())) / Decimal::from(10_000))
    }

    /// Multiplies by an exact ratio (used for exchange-rate conversion).
    pub(crate) fn scale(&self, numerator: Decimal, denominator: Decimal) -> Money {
        Money(self.0.saturating_mul(numerator) / denominator)
    }

    /// Rounds to two decimals, half away from zero.
    ///
    /// Only presentation code calls this. Pipeline arithmetic never does.
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount rounded to two decimals, without a currency symbol.
///
/// Use [`crate::currency::format_amount`] for symbol-bearing output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
