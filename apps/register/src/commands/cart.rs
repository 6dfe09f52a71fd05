//! # Cart Commands
//!
//! Commands acting on the cart of the active order.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Discount │────►│ Invoice  │       │
//! │  │  Cart    │     │          │     │  + Tax   │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                  ▲             │
//! │                   add_to_cart                        pay (sale.rs)      │
//! │                   change_cart_quantity                                  │
//! │                   remove_from_cart     stock moves with every change    │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ─────► stock restored, back to empty      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::currency::{format_amount, to_display};
use cashier_core::{ActiveOrder, CartItem, Currency, Discount, Money, PricingResult};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;

/// A cart line priced in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub product_id: i64,
    pub name: String,
    pub image: String,
    pub price: Money,
    pub quantity: i64,
    pub line_total: Money,
    pub formatted_line_total: String,
}

impl CartLineDto {
    fn new(item: &CartItem, currency: Currency) -> Self {
        let line_total = to_display(item.line_total(), currency);
        CartLineDto {
            product_id: item.product_id,
            name: item.name.clone(),
            image: item.image.clone(),
            price: to_display(item.price, currency),
            quantity: item.cart_quantity,
            line_total,
            formatted_line_total: format_amount(line_total, currency),
        }
    }
}

/// The active cart with its pricing, as the order panel shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub active_order: ActiveOrder,
    pub items: Vec<CartLineDto>,
    /// Pending discount; a fixed amount is shown in `currency`.
    pub discount: Discount,
    /// Every amount in `currency`.
    pub totals: PricingResult,
    pub currency: Currency,
    pub formatted_total: String,
}

fn cart_response(state: &SessionState) -> CartResponse {
    state.with_engine(|e| {
        let currency = e.settings().currency;
        let totals = e.pricing().in_currency(currency);
        CartResponse {
            active_order: e.active_order(),
            items: e
                .active_cart()
                .items
                .iter()
                .map(|item| CartLineDto::new(item, currency))
                .collect(),
            discount: match e.discount() {
                Discount::Amount(value) => Discount::Amount(to_display(value, currency)),
                other => other,
            },
            totals,
            currency,
            formatted_total: format_amount(totals.total, currency),
        }
    })
}

/// Gets the active cart. Empty when no order is selected.
pub fn get_cart(state: &SessionState) -> CartResponse {
    debug!("get_cart command");
    cart_response(state)
}

/// Adds one unit, taking it from stock.
pub fn add_to_cart(state: &SessionState, product_id: i64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "add_to_cart command");
    state.with_engine_mut(|e| e.add_to_cart(product_id))?;
    Ok(cart_response(state))
}

/// Moves a line's quantity by `delta`. Reaching zero removes the line.
pub fn change_cart_quantity(
    state: &SessionState,
    product_id: i64,
    delta: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, delta, "change_cart_quantity command");
    state.with_engine_mut(|e| e.change_cart_quantity(product_id, delta))?;
    Ok(cart_response(state))
}

pub fn remove_from_cart(state: &SessionState, product_id: i64) -> Result<CartResponse, ApiError> {
    debug!(product_id, "remove_from_cart command");
    state.with_engine_mut(|e| e.remove_from_cart(product_id))?;
    Ok(cart_response(state))
}

pub fn clear_cart(state: &SessionState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    state.with_engine_mut(|e| e.clear_cart())?;
    Ok(cart_response(state))
}

/// Sets the pending discount. Fixed amounts are in the active currency.
pub fn set_discount(state: &SessionState, discount: Discount) -> Result<CartResponse, ApiError> {
    debug!(discount = ?discount, "set_discount command");
    state.with_engine_mut(|e| e.set_discount(discount))?;
    Ok(cart_response(state))
}
