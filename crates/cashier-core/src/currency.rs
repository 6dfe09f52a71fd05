//! # Currency Ledger
//!
//! Converts between canonical (base currency) and display amounts.
//!
//! ## Conversion Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every conversion is routed through the base currency (SAR).            │
//! │                                                                         │
//! │   stored price (SAR) ──× rate[SAR] ÷ rate[target]──► display amount     │
//! │                                                                         │
//! │   entered amount ──× rate[source] ÷ rate[SAR]──► stored price (SAR)     │
//! │                                                                         │
//! │  Rates are USD per unit, kept as exact fractions:                       │
//! │     SAR  27/100      USD  1/1      YER  1/530                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Switching the active currency never rewrites stored prices. Converting a
//! freshly entered amount to canonical is one-way: `to_canonical` followed by
//! `to_display` may differ from the input in the far decimals, which is
//! accepted for new products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Currency every stored amount is expressed in.
pub const BASE_CURRENCY: Currency = Currency::Sar;

// =============================================================================
// Currency
// =============================================================================

/// A supported currency. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Sar,
    Usd,
    Yer,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Sar, Currency::Usd, Currency::Yer];

    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Sar => "SAR",
            Currency::Usd => "USD",
            Currency::Yer => "YER",
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            Currency::Sar => "ر.س",
            Currency::Usd => "$",
            Currency::Yer => "﷼",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Currency::Sar => "Saudi Riyal",
            Currency::Usd => "US Dollar",
            Currency::Yer => "Yemeni Rial",
        }
    }

    /// USD per unit of this currency, as `(numerator, denominator)`.
    const fn rate_fraction(&self) -> (i64, i64) {
        match self {
            Currency::Sar => (27, 100),
            Currency::Usd => (1, 1),
            Currency::Yer => (1, 530),
        }
    }

    /// USD per unit of this currency.
    pub fn rate_to_usd(&self) -> Decimal {
        let (num, den) = self.rate_fraction();
        Decimal::from(num) / Decimal::from(den)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAR" => Ok(Currency::Sar),
            "USD" => Ok(Currency::Usd),
            "YER" => Ok(Currency::Yer),
            other => Err(ValidationError::InvalidFormat {
                field: "currency".to_string(),
                reason: format!("unsupported currency code '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts `amount` from one currency to another through exact rate
/// fractions: `amount × (fn/fd) ÷ (tn/td)`.
fn convert(amount: Money, from: Currency, to: Currency) -> Money {
    if from == to {
        return amount;
    }
    let (fnum, fden) = from.rate_fraction();
    let (tnum, tden) = to.rate_fraction();
    amount.scale(
        Decimal::from(fnum * tden),
        Decimal::from(fden * tnum),
    )
}

/// Converts a canonical amount to the `target` display currency.
///
/// ```rust
/// use cashier_core::currency::{to_display, Currency};
/// use cashier_core::money::Money;
///
/// assert_eq!(to_display(Money::from_major(10), Currency::Usd), Money::from_minor(270));
/// ```
pub fn to_display(canonical: Money, target: Currency) -> Money {
    convert(canonical, BASE_CURRENCY, target)
}

/// Converts an amount entered in `source` currency to canonical.
pub fn to_canonical(display: Money, source: Currency) -> Money {
    convert(display, source, BASE_CURRENCY)
}

/// Renders `"{amount:.2} {symbol}"`, rounded half away from zero.
///
/// ```rust
/// use cashier_core::currency::{format_amount, Currency};
/// use cashier_core::money::Money;
///
/// assert_eq!(format_amount(Money::from_minor(1050), Currency::Usd), "10.50 $");
/// ```
pub fn format_amount(amount: Money, currency: Currency) -> String {
    format!("{} {}", amount, currency.symbol())
}

// =============================================================================
// Unit Tests
// =============================================================================
