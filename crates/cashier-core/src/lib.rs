//! # cashier-core: Order & Inventory Consistency Engine
//!
//! This crate is the **heart** of Cashier POS. It keeps product stock, cart
//! contents, multi-currency pricing, discounts, tax and invoices consistent,
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashier POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (external collaborator)                   │   │
//! │  │    Catalog ──► Tables / Takeaway ──► Cart ──► Pay ──► Receipt   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Register Commands                            │   │
//! │  │    add_to_cart, select_table, pay, set_currency, etc.           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cashier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   currency ─► inventory ─► cart ─► router ─► pricing ─► invoice │   │
//! │  │                                                                 │   │
//! │  │   engine: PosEngine owns every collection                       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashier-db (Storage Layer)                      │   │
//! │  │           key-value records, migrations, write queue            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal Money
//! - [`currency`] - Currency ledger (canonical ⇄ display)
//! - [`inventory`] - Authoritative stock per product
//! - [`cart`] - Cart lines and the cart mutator
//! - [`router`] - Active order selection
//! - [`pricing`] - Subtotal → discount → tax → total
//! - [`invoice`] - Invoice emission and the invoice ledger
//! - [`catalog`] - Listings, categories, image prompts
//! - [`reports`] - Sales reports
//! - [`engine`] - `PosEngine`, the aggregate the register drives
//!
//! ## Example Usage
//!
//! ```rust
//! use cashier_core::{PosEngine, PaymentMethod, ProductDraft, Money};
//! use chrono::Utc;
//!
//! let mut engine = PosEngine::default();
//! let tea = engine
//!     .add_product(&ProductDraft {
//!         name: "Tea".to_string(),
//!         category: "Drinks".to_string(),
//!         price: Money::from_major(10),
//!         quantity: 5,
//!         image: None,
//!     })
//!     .unwrap();
//!
//! engine.select_takeaway();
//! engine.add_to_cart(tea.id).unwrap();
//! let invoice = engine.pay(PaymentMethod::Cash, None, Utc::now()).unwrap();
//!
//! // 10.00 + 15% VAT
//! assert_eq!(invoice.total.to_string(), "11.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod collection;
pub mod currency;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod reports;
pub mod router;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cashier_core::Money` instead of
// `use cashier_core::money::Money`

pub use cart::{Cart, CartItem};
pub use catalog::{ImagePromptStyle, ProductView};
pub use collection::Collection;
pub use currency::{Currency, BASE_CURRENCY};
pub use engine::PosEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{Discount, PricingResult};
pub use reports::{DateRange, SalesReport};
pub use settings::{Language, ProfileField, Settings, StoreProfile};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default VAT: 15%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1500;

/// Seats given to a new table when none are specified.
pub const DEFAULT_TABLE_SEATS: u32 = 4;

/// Upper bound on seats per table.
pub const MAX_TABLE_SEATS: u32 = 50;

/// Highest unit price accepted from a product form, in whole units of the
/// entry currency.
pub const MAX_PRICE: i64 = 1_000_000;

/// Highest stock level a product may be given.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

/// Highest fixed discount accepted, in whole units of the entry currency.
pub const MAX_DISCOUNT_AMOUNT: i64 = 1_000_000_000;

/// Upper bound on names (products, categories, tables, customers).
pub const MAX_NAME_LENGTH: usize = 200;

/// Image used for products created without one.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/200x200.png";

pub const DEFAULT_STORE_NAME: &str = "Cashier Pro";

pub const DEFAULT_INVOICE_FOOTER: &str = "Thank you for your visit!";
