//! # Cart Mutator
//!
//! Cart lines and the operations that move units between a cart and the
//! inventory.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart ⇄ Inventory                                     │
//! │                                                                         │
//! │  Operation               Cart change            Inventory change        │
//! │  ─────────               ───────────            ────────────────        │
//! │                                                                         │
//! │  add_item(p) ──────────► line(p) += 1 ────────► stock(p) -= 1          │
//! │                                                                         │
//! │  change_quantity(p, d) ► line(p) += d ────────► stock(p) -= d          │
//! │    (result <= 0) ──────► line removed ────────► stock(p) += old qty    │
//! │                                                                         │
//! │  remove_item(p) ───────► line removed ────────► stock(p) += qty        │
//! │                                                                         │
//! │  clear() ──────────────► all lines removed ───► every qty restored     │
//! │                                                                         │
//! │  release() ────────────► all lines removed      (nothing restored)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conservation
//! For every product, `Σ(line quantity over all carts) + stock` is the same
//! before and after `add_item`, `change_quantity`, `remove_item` and `clear`.
//! Each function validates first and only then touches the cart and the
//! inventory, so a rejected call changes nothing.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in a cart.
///
/// The product fields are a snapshot taken when the line was created: later
/// price or category edits change the catalog but not this line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    /// Canonical unit price at the time the line was created.
    pub price: Money,
    pub image: String,
    /// Units in this line. Always at least 1.
    pub cart_quantity: i64,
}

impl CartItem {
    pub fn from_product(product: &Product, cart_quantity: i64) -> Self {
        CartItem {
            product_id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            image: product.image.clone(),
            cart_quantity,
        }
    }

    /// Unit price × quantity, in canonical currency.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.cart_quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered list of cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn line(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    fn line_index(&self, product_id: i64) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|i| i.product_id == product_id)
            .ok_or(CoreError::ItemNotInCart(product_id))
    }

    /// Units of one product held by this cart (0 if no line).
    pub fn units_of(&self, product_id: i64) -> i64 {
        self.line(product_id).map_or(0, |i| i.cart_quantity)
    }

    /// Sum of line totals, in canonical currency.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

// =============================================================================
// Mutations
// =============================================================================

/// Puts one unit of a product into the cart.
///
/// ## Errors
/// - `ProductNotFound` for an unknown id
/// - `OutOfStock` when the product has no stock left
pub fn add_item(cart: &mut Cart, inventory: &mut Inventory, product_id: i64) -> CoreResult<()> {
    let product = inventory.require(product_id)?;
    if product.quantity <= 0 {
        return Err(CoreError::OutOfStock {
            product_id,
            name: product.name.clone(),
        });
    }
    let snapshot = CartItem::from_product(product, 1);

    inventory.adjust_stock(product_id, -1)?;
    match cart.items.iter_mut().find(|i| i.product_id == product_id) {
        Some(line) => line.cart_quantity += 1,
        None => cart.items.push(snapshot),
    }
    Ok(())
}

/// Moves `delta` units between the cart line and the inventory.
///
/// If the line would drop to zero or below it is removed and its whole
/// previous quantity goes back to stock. `delta == 0` does nothing.
///
/// ## Errors
/// - `ItemNotInCart` when the cart has no line for the product
/// - `OutOfStock` for a positive delta with no stock left
/// - `InsufficientStock` for a positive delta larger than the stock, or one
///   so large the line quantity would overflow
pub fn change_quantity(
    cart: &mut Cart,
    inventory: &mut Inventory,
    product_id: i64,
    delta: i64,
) -> CoreResult<()> {
    let index = cart.line_index(product_id)?;
    if delta == 0 {
        return Ok(());
    }

    let current = cart.items[index].cart_quantity;
    let Some(next) = current.checked_add(delta) else {
        return Err(CoreError::InsufficientStock {
            product_id,
            available: inventory.quantity(product_id)?,
            requested: delta,
        });
    };

    if next <= 0 {
        inventory.adjust_stock(product_id, current)?;
        cart.items.remove(index);
        return Ok(());
    }

    if delta > 0 {
        let product = inventory.require(product_id)?;
        if product.quantity < 1 {
            return Err(CoreError::OutOfStock {
                product_id,
                name: product.name.clone(),
            });
        }
    }

    // adjust_stock rejects before mutating, so the line stays untouched on error
    inventory.adjust_stock(product_id, -delta)?;
    cart.items[index].cart_quantity = next;
    Ok(())
}

/// Removes a line and returns its full quantity to stock.
pub fn remove_item(cart: &mut Cart, inventory: &mut Inventory, product_id: i64) -> CoreResult<()> {
    let index = cart.line_index(product_id)?;
    let quantity = cart.items[index].cart_quantity;

    inventory.adjust_stock(product_id, quantity)?;
    cart.items.remove(index);
    Ok(())
}

/// Empties the cart, returning every line's quantity to stock.
pub fn clear(cart: &mut Cart, inventory: &mut Inventory) -> CoreResult<()> {
    for item in &cart.items {
        inventory.require(item.product_id)?;
    }
    for item in cart.items.drain(..) {
        inventory.adjust_stock(item.product_id, item.cart_quantity)?;
    }
    Ok(())
}

/// Empties the cart WITHOUT restoring stock and hands back its lines.
///
/// Only payment uses this: the units leave the shop with the customer.
pub fn release(cart: &mut Cart) -> Vec<CartItem> {
    std::mem::take(&mut cart.items)
}

// =============================================================================
// Unit Tests
// =============================================================================
