//! # Pricing Pipeline
//!
//! Turns a cart into totals. Pure and exact: calling it twice on the same
//! input yields identical results, and nothing is rounded until display.
//!
//! ## Pipeline Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. subtotal      = Σ(unit price × quantity)                            │
//! │  2. discount      = Amount:     min(value, subtotal)                    │
//! │                     Percentage: min(subtotal × value / 100, subtotal)   │
//! │  3. taxable_base  = subtotal − discount                                 │
//! │  4. tax           = taxable_base × rate                                 │
//! │  5. total         = taxable_base + tax                                  │
//! │                                                                         │
//! │  Example: 100, 10% off, 15% tax → 10 / 90 / 13.50 / 103.50              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::currency::{to_display, Currency};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// Discount
// =============================================================================

/// The discount pending on the active order.
///
/// `Amount` is always canonical. The engine converts display-currency input
/// before storing it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    #[default]
    None,
    Amount(Money),
    Percentage(Decimal),
}

impl Discount {
    /// The discount in canonical money for a given subtotal, bounded to
    /// `0 ..= subtotal`.
    pub fn resolve(&self, subtotal: Money) -> Money {
        let raw = match *self {
            Discount::None => Money::zero(),
            Discount::Amount(value) => value,
            Discount::Percentage(pct) if pct >= Decimal::ONE_HUNDRED => subtotal,
            Discount::Percentage(pct) => subtotal.percent(pct),
        };
        raw.max(Money::zero()).min(subtotal.max(Money::zero()))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Discount::None)
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Output of the pipeline. All amounts in the same currency (canonical
/// unless produced by [`PricingResult::in_currency`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub subtotal: Money,
    pub discount: Money,
    pub taxable_base: Money,
    pub tax: Money,
    pub total: Money,
}

impl PricingResult {
    /// The same result converted to a display currency.
    pub fn in_currency(&self, currency: Currency) -> PricingResult {
        PricingResult {
            subtotal: to_display(self.subtotal, currency),
            discount: to_display(self.discount, currency),
            taxable_base: to_display(self.taxable_base, currency),
            tax: to_display(self.tax, currency),
            total: to_display(self.total, currency),
        }
    }
}

/// Runs the pipeline over a cart.
pub fn price(cart: &Cart, discount: &Discount, tax_rate: TaxRate) -> PricingResult {
    let subtotal = cart.subtotal();
    let discount = discount.resolve(subtotal);
    let taxable_base = subtotal - discount;
    let tax = taxable_base.calculate_tax(tax_rate);

    PricingResult {
        subtotal,
        discount,
        taxable_base,
        tax,
        total: taxable_base + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
