//! # Invoice Emitter
//!
//! Freezes a paid cart into an [`Invoice`] and keeps the append-only,
//! newest-first invoice ledger.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart (non-empty) + PricingResult + method + customer?                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  id = now in millis (next free integer on collision)                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  lines released from the cart (stock NOT restored)                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Invoice prepended to the ledger                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{self, Cart};
use crate::currency::Currency;
use crate::error::{CoreError, CoreResult};
use crate::pricing::PricingResult;
use crate::types::{Customer, Invoice, PaymentMethod, TaxRate};

/// Everything about a payment that is not in the cart.
#[derive(Debug, Clone, Copy)]
pub struct Payment<'a> {
    pub method: PaymentMethod,
    pub customer: Option<&'a Customer>,
    pub tax_rate: TaxRate,
    pub currency: Currency,
    pub now: DateTime<Utc>,
}

// =============================================================================
// Invoice Ledger
// =============================================================================

/// Completed invoices, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceLedger {
    invoices: Vec<Invoice>,
}

impl InvoiceLedger {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        InvoiceLedger { invoices }
    }

    /// All invoices, newest first.
    #[inline]
    pub fn all(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn get(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Invoices whose id contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Invoice> {
        let needle = term.trim().to_lowercase();
        self.invoices
            .iter()
            .filter(|i| i.id.to_lowercase().contains(&needle))
            .collect()
    }

    /// Time-derived id that no existing invoice uses.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Prepends an invoice, rejecting a duplicate id.
    pub fn insert(&mut self, invoice: Invoice) -> CoreResult<()> {
        if self.get(&invoice.id).is_some() {
            return Err(CoreError::DuplicateKey {
                entity: "Invoice".to_string(),
                key: invoice.id,
            });
        }
        self.invoices.insert(0, invoice);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

// =============================================================================
// Emission
// =============================================================================

/// Emits an invoice for `cart` and empties it without restoring stock.
///
/// ## Errors
/// - `EmptyCart` when the cart has no lines (nothing changes)
pub fn finalize_payment(
    cart: &mut Cart,
    pricing: &PricingResult,
    payment: Payment<'_>,
    ledger: &mut InvoiceLedger,
) -> CoreResult<Invoice> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let invoice = Invoice {
        id: ledger.next_id(payment.now),
        created_at: payment.now,
        items: cart.items.clone(),
        subtotal: pricing.subtotal,
        discount: pricing.discount,
        tax: pricing.tax,
        total: pricing.total,
        tax_rate: payment.tax_rate,
        currency: payment.currency,
        payment_method: payment.method,
        customer_id: payment.customer.map(|c| c.id),
        customer_name: payment.customer.map(|c| c.name.clone()),
    };

    ledger.insert(invoice.clone())?;
    cart::release(cart);
    Ok(invoice)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::money::Money;
    use crate::pricing::{price, Discount};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn cart() -> Cart {
        Cart {
            items: vec![CartItem {
                product_id: 1,
                name: "Coffee".to_string(),
                category: "Drinks".to_string(),
                price: Money::from_major(10),
                image: String::new(),
                cart_quantity: 2,
            }],
        }
    }

    fn payment(customer: Option<&Customer>) -> Payment<'_> {
        Payment {
            method: PaymentMethod::Cash,
            customer,
            tax_rate: TaxRate::default(),
            currency: Currency::Sar,
            now: now(),
        }
    }

    #[test]
    fn test_finalize_payment_freezes_cart() {
        let mut cart = cart();
        let mut ledger = InvoiceLedger::default();
        let pricing = price(&cart, &Discount::None, TaxRate::default());

        let invoice = finalize_payment(&mut cart, &pricing, payment(None), &mut ledger).unwrap();

        assert!(cart.is_empty());
        assert_eq!(invoice.id, now().timestamp_millis().to_string());
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.total, Money::from_major(23));
        assert_eq!(ledger.all()[0], invoice);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cart = Cart::new();
        let mut ledger = InvoiceLedger::default();
        let pricing = PricingResult::default();

        assert_eq!(
            finalize_payment(&mut cart, &pricing, payment(None), &mut ledger),
            Err(CoreError::EmptyCart)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_same_millisecond_gets_next_id_and_newest_first() {
        let mut ledger = InvoiceLedger::default();
        for _ in 0..2 {
            let mut cart = cart();
            let pricing = price(&cart, &Discount::None, TaxRate::default());
            finalize_payment(&mut cart, &pricing, payment(None), &mut ledger).unwrap();
        }

        let base = now().timestamp_millis();
        assert_eq!(ledger.all()[0].id, (base + 1).to_string());
        assert_eq!(ledger.all()[1].id, base.to_string());
    }

    #[test]
    fn test_explicit_duplicate_insert_rejected() {
        let mut cart = cart();
        let mut ledger = InvoiceLedger::default();
        let pricing = price(&cart, &Discount::None, TaxRate::default());
        let invoice = finalize_payment(&mut cart, &pricing, payment(None), &mut ledger).unwrap();

        assert!(matches!(
            ledger.insert(invoice),
            Err(CoreError::DuplicateKey { .. })
        ));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_customer_name_is_copied() {
        let customer = Customer {
            id: 3,
            name: "Sara".to_string(),
            phone: "0500000000".to_string(),
            email: None,
        };
        let mut cart = cart();
        let mut ledger = InvoiceLedger::default();
        let pricing = price(&cart, &Discount::None, TaxRate::default());

        let invoice =
            finalize_payment(&mut cart, &pricing, payment(Some(&customer)), &mut ledger).unwrap();
        assert_eq!(invoice.customer_id, Some(3));
        assert_eq!(invoice.customer_name.as_deref(), Some("Sara"));
    }

    #[test]
    fn test_search_by_id_substring() {
        let mut ledger = InvoiceLedger::default();
        let mut cart = cart();
        let pricing = price(&cart, &Discount::None, TaxRate::default());
        let invoice = finalize_payment(&mut cart, &pricing, payment(None), &mut ledger).unwrap();

        let tail = &invoice.id[invoice.id.len() - 4..];
        assert_eq!(ledger.search(tail).len(), 1);
        assert!(ledger.search("nope").is_empty());
        assert_eq!(ledger.search("").len(), 1);
    }
}
