//! # Domain Types
//!
//! Core domain types used throughout Cashier POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Table       │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (max + 1)   │   │  id (max + 1)   │   │  id (millis)    │       │
//! │  │  category (tag) │   │  seats          │   │  items (frozen) │       │
//! │  │  price (SAR)    │   │  cart (owned)   │   │  totals (SAR)   │       │
//! │  │  quantity ≥ 0   │   │  total (cached) │   │  customer copy  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  ActiveOrder    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  None           │   │  Cash           │       │
//! │  │  1500 = 15%     │   │  Table(id)      │   │  Card           │       │
//! │  └─────────────────┘   │  Takeaway       │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Amounts
//! Every `Money` stored in these types is in the base currency (SAR). Display
//! amounts exist only on the way in (drafts) and on the way out (views).

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartItem};
use crate::currency::Currency;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the default VAT rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percentage(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Creates a tax rate from a decimal percentage such as `8.25`.
    ///
    /// Returns `None` for negative or out-of-range values and for values
    /// finer than one basis point.
    pub fn from_percent(pct: Decimal) -> Option<Self> {
        let bps = pct.checked_mul(Decimal::ONE_HUNDRED)?;
        if !bps.fract().is_zero() {
            return None;
        }
        bps.to_u32().map(TaxRate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact percentage.
    #[inline]
    pub fn percentage(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
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
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, `max(existing) + 1`.
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Free-text category tag.
    pub category: String,

    /// Price in the base currency.
    pub price: Money,

    /// Units in stock. Never negative.
    pub quantity: i64,

    /// Image reference (URL or data URI).
    pub image: String,

    /// Search hint for image generation (lower-cased name).
    #[serde(default)]
    pub image_hint: Option<String>,
}

/// Operator input for creating or editing a product.
///
/// `price` is in whatever currency is active when the form is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How an invoice was settled. A label only; no gateway is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Operator input for creating or editing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Table
// =============================================================================

/// Whether a table has an open order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
}

/// A dine-in table and the cart it owns.
///
/// ## Invariants
/// - Status is never stored: Occupied iff the cart has lines
/// - `total` is the cart priced with no discount at the current tax rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: i64,
    pub name: String,
    pub seats: u32,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub total: Money,
}

impl Table {
    pub fn new(id: i64, name: impl Into<String>, seats: u32) -> Self {
        Table {
            id,
            name: name.into(),
            seats,
            cart: Cart::default(),
            total: Money::zero(),
        }
    }

    #[inline]
    pub fn status(&self) -> TableStatus {
        if self.cart.is_empty() {
            TableStatus::Available
        } else {
            TableStatus::Occupied
        }
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.status() == TableStatus::Occupied
    }
}

/// Operator input for creating or editing a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableDraft {
    pub name: String,
    #[serde(default = "default_seats")]
    pub seats: u32,
}

fn default_seats() -> u32 {
    crate::DEFAULT_TABLE_SEATS
}

// =============================================================================
// Active Order
// =============================================================================

/// Which cart the cart mutator currently acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "tableId", rename_all = "snake_case")]
pub enum ActiveOrder {
    #[default]
    None,
    Table(i64),
    Takeaway,
}

impl ActiveOrder {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, ActiveOrder::None)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A paid order, frozen at the moment of payment.
///
/// Invoices are append-only. Nothing in the engine mutates one after it is
/// emitted; later edits to products or customers leave it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Milliseconds since the Unix epoch, as a decimal string.
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Deep copy of the paid cart lines.
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    /// Tax rate applied at payment.
    pub tax_rate: TaxRate,
    /// Currency active at payment (informational).
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_id: Option<i64>,
    /// Name copy taken at payment; survives customer edits and deletion.
    #[serde(default)]
    pub customer_name: Option<String>,
}

impl Invoice {
    /// Total units sold on this invoice.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|i| i.cart_quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
