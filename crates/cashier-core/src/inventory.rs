//! # Inventory Store
//!
//! The authoritative stock count per product.
//!
//! Stock only moves through [`Inventory::adjust_stock`] (driven by the cart
//! mutator) or through direct catalog management. Pricing never touches it.
//!
//! ```text
//!   sale      adjust_stock(id, -n)  ──► fails if stock would go below 0
//!   restock   adjust_stock(id, +n)  ──► fails only if the count would overflow
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

/// The product catalog together with its stock counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    products: Vec<Product>,
}

impl Inventory {
    pub fn new(products: Vec<Product>) -> Self {
        Inventory { products }
    }

    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub(crate) fn get_mut(&mut self, product_id: i64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == product_id)
    }

    /// Looks up a product or fails with `ProductNotFound`.
    pub fn require(&self, product_id: i64) -> CoreResult<&Product> {
        self.get(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))
    }

    /// Current stock for a product.
    pub fn quantity(&self, product_id: i64) -> CoreResult<i64> {
        self.require(product_id).map(|p| p.quantity)
    }

    /// Applies a stock delta and returns the new quantity.
    ///
    /// ## Errors
    /// - `ProductNotFound` for an unknown id
    /// - `InsufficientStock` when a negative delta would go below zero or
    ///   the sum overflows (stock is left unchanged)
    pub fn adjust_stock(&mut self, product_id: i64, delta: i64) -> CoreResult<i64> {
        let product = self
            .get_mut(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;

        let next = product.quantity.checked_add(delta).filter(|n| *n >= 0);
        let Some(next) = next else {
            return Err(CoreError::InsufficientStock {
                product_id,
                available: product.quantity,
                requested: delta.saturating_neg(),
            });
        };

        product.quantity = next;
        Ok(next)
    }

    /// Next product id: `max(existing) + 1`, or 1 for an empty catalog.
    pub fn next_id(&self) -> i64 {
        self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Inserts a product, rejecting a duplicate id.
    pub fn insert(&mut self, product: Product) -> CoreResult<()> {
        if self.get(product.id).is_some() {
            return Err(CoreError::DuplicateKey {
                entity: "Product".to_string(),
                key: product.id.to_string(),
            });
        }
        self.products.push(product);
        Ok(())
    }

    pub fn remove(&mut self, product_id: i64) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        Ok(self.products.remove(index))
    }

    /// Rewrites the category tag of every product carrying `from`.
    /// Returns how many products changed.
    pub(crate) fn retag(&mut self, from: &str, to: &str) -> usize {
        let mut changed = 0;
        for product in self.products.iter_mut().filter(|p| p.category == from) {
            product.category = to.to_string();
            changed += 1;
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::money::Money;

    pub(crate) fn product(id: i64, price_major: i64, quantity: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            category: "General".to_string(),
            price: Money::from_major(price_major),
            quantity,
            image: crate::PLACEHOLDER_IMAGE.to_string(),
            image_hint: None,
        }
    }

    #[test]
    fn test_adjust_stock_sale_and_restock() {
        let mut inv = Inventory::new(vec![product(1, 10, 5)]);

        assert_eq!(inv.adjust_stock(1, -2).unwrap(), 3);
        assert_eq!(inv.adjust_stock(1, 4).unwrap(), 7);
        assert_eq!(inv.quantity(1).unwrap(), 7);
    }

    #[test]
    fn test_adjust_stock_rejects_negative_result() {
        let mut inv = Inventory::new(vec![product(1, 10, 1)]);

        let err = inv.adjust_stock(1, -3).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: 1,
                available: 1,
                requested: 3
            }
        );
        assert_eq!(inv.quantity(1).unwrap(), 1);
    }

    #[test]
    fn test_adjust_stock_rejects_overflow() {
        let mut inv = Inventory::new(vec![product(1, 10, i64::MAX - 1)]);

        let err = inv.adjust_stock(1, 2).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { product_id: 1, .. }));
        assert_eq!(inv.quantity(1).unwrap(), i64::MAX - 1);
    }

    #[test]
    fn test_adjust_unknown_product() {
        let mut inv = Inventory::default();
        assert_eq!(inv.adjust_stock(9, 1), Err(CoreError::ProductNotFound(9)));
    }

    #[test]
    fn test_next_id() {
        let mut inv = Inventory::default();
        assert_eq!(inv.next_id(), 1);

        inv.insert(product(4, 1, 1)).unwrap();
        inv.insert(product(2, 1, 1)).unwrap();
        assert_eq!(inv.next_id(), 5);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let mut inv = Inventory::new(vec![product(1, 10, 1)]);
        assert!(matches!(
            inv.insert(product(1, 5, 5)),
            Err(CoreError::DuplicateKey { .. })
        ));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let inv = Inventory::new(vec![product(1, 10, 1)]);
        let json = serde_json::to_value(&inv).unwrap();
        assert!(json.is_array());
    }
}
