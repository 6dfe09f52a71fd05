//! # Order Router
//!
//! Decides which cart the rest of the engine works on.
//!
//! ```text
//!   ActiveOrder::Table(id) ──► that table's cart (if the table exists)
//!   ActiveOrder::Takeaway  ──► the takeaway cart
//!   ActiveOrder::None      ──► empty read-only cart, mutations fail
//! ```
//!
//! The router never owns a cart. Tables own theirs, the engine owns the
//! takeaway cart, and resolution borrows whichever one is active.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::types::{ActiveOrder, Table};

/// Holder of the single active order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRouter {
    active: ActiveOrder,
}

impl OrderRouter {
    pub fn new(active: ActiveOrder) -> Self {
        OrderRouter { active }
    }

    #[inline]
    pub fn active(&self) -> ActiveOrder {
        self.active
    }

    /// Opens or continues a table's order.
    ///
    /// An id with no table fails with `TableNotFound` and keeps the current
    /// selection.
    pub fn select_table(&mut self, table_id: i64, tables: &[Table]) -> CoreResult<()> {
        if !tables.iter().any(|t| t.id == table_id) {
            return Err(CoreError::TableNotFound(table_id));
        }
        self.active = ActiveOrder::Table(table_id);
        Ok(())
    }

    pub fn select_takeaway(&mut self) {
        self.active = ActiveOrder::Takeaway;
    }

    pub fn clear(&mut self) {
        self.active = ActiveOrder::None;
    }

    /// Borrows the active cart, or `None` when nothing resolves.
    pub fn resolve<'a>(&self, tables: &'a [Table], takeaway: &'a Cart) -> Option<&'a Cart> {
        match self.active {
            ActiveOrder::None => None,
            ActiveOrder::Takeaway => Some(takeaway),
            ActiveOrder::Table(id) => tables.iter().find(|t| t.id == id).map(|t| &t.cart),
        }
    }

    /// Mutable counterpart of [`resolve`](Self::resolve).
    pub fn resolve_mut<'a>(
        &self,
        tables: &'a mut [Table],
        takeaway: &'a mut Cart,
    ) -> Option<&'a mut Cart> {
        match self.active {
            ActiveOrder::None => None,
            ActiveOrder::Takeaway => Some(takeaway),
            ActiveOrder::Table(id) => tables
                .iter_mut()
                .find(|t| t.id == id)
                .map(|t| &mut t.cart),
        }
    }

    /// Like [`resolve_mut`](Self::resolve_mut) but fails with `NoActiveOrder`.
    pub fn require_mut<'a>(
        &self,
        tables: &'a mut [Table],
        takeaway: &'a mut Cart,
    ) -> CoreResult<&'a mut Cart> {
        self.resolve_mut(tables, takeaway)
            .ok_or(CoreError::NoActiveOrder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Vec<Table> {
        vec![Table::new(1, "T1", 4), Table::new(2, "T2", 2)]
    }

    #[test]
    fn test_none_resolves_to_nothing() {
        let router = OrderRouter::default();
        let mut tables = tables();
        let mut takeaway = Cart::new();

        assert!(router.resolve(&tables, &takeaway).is_none());
        assert_eq!(
            router.require_mut(&mut tables, &mut takeaway).unwrap_err(),
            CoreError::NoActiveOrder
        );
    }

    #[test]
    fn test_select_table_resolves_its_cart() {
        let mut router = OrderRouter::default();
        let mut tables = tables();
        let mut takeaway = Cart::new();

        router.select_table(2, &tables).unwrap();
        assert_eq!(router.active(), ActiveOrder::Table(2));

        let cart = router.require_mut(&mut tables, &mut takeaway).unwrap();
        cart.items.push(crate::cart::CartItem {
            product_id: 1,
            name: "Tea".to_string(),
            category: "Drinks".to_string(),
            price: crate::money::Money::from_major(2),
            image: String::new(),
            cart_quantity: 1,
        });
        assert!(tables[1].is_occupied());
        assert!(takeaway.is_empty());
    }

    #[test]
    fn test_select_unknown_table_keeps_previous_order() {
        let mut router = OrderRouter::default();
        router.select_takeaway();

        assert_eq!(
            router.select_table(9, &tables()),
            Err(CoreError::TableNotFound(9))
        );
        assert_eq!(router.active(), ActiveOrder::Takeaway);
    }

    #[test]
    fn test_deleted_table_resolves_to_nothing() {
        let mut router = OrderRouter::default();
        let mut tables = tables();
        router.select_table(1, &tables).unwrap();
        tables.remove(0);

        assert!(router.resolve(&tables, &Cart::new()).is_none());
    }

    #[test]
    fn test_clear() {
        let mut router = OrderRouter::new(ActiveOrder::Takeaway);
        router.clear();
        assert!(router.active().is_none());
    }
}
