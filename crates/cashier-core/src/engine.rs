//! # POS Engine
//!
//! The single owner of every collection the register works with, and the
//! only place mutations happen.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           PosEngine                                     │
//! │                                                                         │
//! │   inventory ◄──────── cart mutator ────────► active cart                │
//! │   (products, stock)        ▲                   │                        │
//! │                            │                   ├── tables[i].cart       │
//! │                      OrderRouter ──────────────┤                        │
//! │                      (ActiveOrder)             └── takeaway             │
//! │                                                                         │
//! │   pricing(active cart, discount, settings.tax_rate) ──► PricingResult   │
//! │                                                                         │
//! │   pay() ──► InvoiceLedger (newest first)                                │
//! │                                                                         │
//! │   Every mutation marks the collections it touched as dirty; the        │
//! │   session drains them with take_dirty() and persists each one.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here reads the clock or does I/O: payment and reports take `now`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::cart::{self, Cart};
use crate::catalog::{self, ProductView};
use crate::collection::Collection;
use crate::currency::{to_canonical, Currency};
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::invoice::{self, InvoiceLedger, Payment};
use crate::pricing::{self, Discount, PricingResult};
use crate::reports::{self, DateRange, SalesReport};
use crate::router::OrderRouter;
use crate::settings::{ProfileField, Settings};
use crate::types::{
    ActiveOrder, Customer, CustomerDraft, Invoice, PaymentMethod, Product, ProductDraft, Table,
    TableDraft, TaxRate,
};
use crate::validation;

/// Read-only stand-in when no order is active.
static EMPTY_CART: Cart = Cart { items: Vec::new() };

/// All register state.
#[derive(Debug, Clone, Default)]
pub struct PosEngine {
    inventory: Inventory,
    categories: Vec<String>,
    tables: Vec<Table>,
    takeaway: Cart,
    router: OrderRouter,
    invoices: InvoiceLedger,
    customers: Vec<Customer>,
    settings: Settings,
    /// Pending discount input for the active order. Not persisted.
    discount: Discount,
    dirty: BTreeSet<Collection>,
}

impl PosEngine {
    /// An empty engine with the given default settings.
    pub fn new(settings: Settings) -> Self {
        PosEngine {
            settings,
            ..PosEngine::default()
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn products(&self) -> &[Product] {
        self.inventory.products()
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.inventory.get(id)
    }

    /// Every product with its price in the active currency.
    pub fn catalog(&self) -> Vec<ProductView> {
        self.filter_catalog(None, "")
    }

    pub fn filter_catalog(&self, category: Option<&str>, search: &str) -> Vec<ProductView> {
        catalog::filter_catalog(self.inventory.products(), category, search)
            .into_iter()
            .map(|p| ProductView::new(p, self.settings.currency))
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        catalog::categories(&self.categories, self.inventory.products())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: i64) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn takeaway(&self) -> &Cart {
        &self.takeaway
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Invoices, newest first.
    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.all()
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    pub fn search_invoices(&self, term: &str) -> Vec<&Invoice> {
        self.invoices.search(term)
    }

    pub fn active_order(&self) -> ActiveOrder {
        self.router.active()
    }

    /// The active cart, or an empty one when nothing resolves.
    pub fn active_cart(&self) -> &Cart {
        self.router
            .resolve(&self.tables, &self.takeaway)
            .unwrap_or(&EMPTY_CART)
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    /// Canonical totals for the active cart.
    pub fn pricing(&self) -> PricingResult {
        pricing::price(self.active_cart(), &self.discount, self.settings.tax_rate)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sales_report(&self, range: DateRange, now: DateTime<Utc>) -> SalesReport {
        reports::sales_report(self.invoices.all(), range, now)
    }

    // =========================================================================
    // Products & Categories
    // =========================================================================

    /// Adds a product priced in the active currency.
    pub fn add_product(&mut self, draft: &ProductDraft) -> CoreResult<Product> {
        validation::validate_product_draft(draft)?;

        let product = catalog::new_product(self.inventory.next_id(), draft, self.settings.currency);
        self.inventory.insert(product.clone())?;
        self.mark(Collection::Products);
        Ok(product)
    }

    pub fn edit_product(&mut self, id: i64, draft: &ProductDraft) -> CoreResult<Product> {
        validation::validate_product_draft(draft)?;

        let currency = self.settings.currency;
        let product = self
            .inventory
            .get_mut(id)
            .ok_or(CoreError::ProductNotFound(id))?;
        catalog::apply_edit(product, draft, currency);
        let product = product.clone();

        self.mark(Collection::Products);
        Ok(product)
    }

    /// Replaces a product's image (e.g. with a generated data URI).
    pub fn set_product_image(&mut self, id: i64, image: String) -> CoreResult<()> {
        let product = self
            .inventory
            .get_mut(id)
            .ok_or(CoreError::ProductNotFound(id))?;
        product.image = image;
        self.mark(Collection::Products);
        Ok(())
    }

    /// Deletes a product. Rejected while any open cart holds units of it.
    pub fn delete_product(&mut self, id: i64) -> CoreResult<Product> {
        self.inventory.require(id)?;
        if self.open_carts().any(|c| c.units_of(id) > 0) {
            return Err(CoreError::ProductInOpenOrder { product_id: id });
        }

        let removed = self.inventory.remove(id)?;
        self.mark(Collection::Products);
        Ok(removed)
    }

    pub fn add_category(&mut self, name: &str) -> CoreResult<()> {
        catalog::add_category(&mut self.categories, self.inventory.products(), name)?;
        self.mark(Collection::Categories);
        Ok(())
    }

    /// Returns the number of products retagged.
    pub fn rename_category(&mut self, old: &str, new: &str) -> usize {
        let before = self.categories.clone();
        let retagged = catalog::rename_category(&mut self.categories, &mut self.inventory, old, new);
        if self.categories != before {
            self.mark(Collection::Categories);
        }
        if retagged > 0 {
            self.mark(Collection::Products);
        }
        retagged
    }

    pub fn delete_category(&mut self, name: &str) -> CoreResult<()> {
        catalog::delete_category(&mut self.categories, self.inventory.products(), name)?;
        self.mark(Collection::Categories);
        Ok(())
    }

    // =========================================================================
    // Tables
    // =========================================================================

    pub fn add_table(&mut self, draft: &TableDraft) -> CoreResult<Table> {
        validation::validate_table_draft(draft)?;

        let id = self.tables.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let table = Table::new(id, draft.name.trim(), draft.seats);
        self.tables.push(table.clone());
        self.mark(Collection::Tables);
        Ok(table)
    }

    pub fn edit_table(&mut self, id: i64, draft: &TableDraft) -> CoreResult<Table> {
        validation::validate_table_draft(draft)?;

        let table = self
            .tables
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CoreError::TableNotFound(id))?;
        table.name = draft.name.trim().to_string();
        table.seats = draft.seats;
        let table = table.clone();

        self.mark(Collection::Tables);
        Ok(table)
    }

    /// Deletes an Available table. Occupied tables are rejected.
    pub fn delete_table(&mut self, id: i64) -> CoreResult<Table> {
        let index = self
            .tables
            .iter()
            .position(|t| t.id == id)
            .ok_or(CoreError::TableNotFound(id))?;
        if self.tables[index].is_occupied() {
            return Err(CoreError::TableOccupied { table_id: id });
        }

        let removed = self.tables.remove(index);
        self.mark(Collection::Tables);
        if self.router.active() == ActiveOrder::Table(id) {
            self.clear_active_order();
        }
        Ok(removed)
    }

    // =========================================================================
    // Order Routing
    // =========================================================================

    pub fn select_table(&mut self, id: i64) -> CoreResult<()> {
        self.router.select_table(id, &self.tables)?;
        self.mark(Collection::ActiveOrder);
        Ok(())
    }

    pub fn select_takeaway(&mut self) {
        self.router.select_takeaway();
        self.mark(Collection::ActiveOrder);
    }

    /// Deselects the active order and drops any pending discount.
    pub fn clear_active_order(&mut self) {
        self.router.clear();
        self.discount = Discount::None;
        self.mark(Collection::ActiveOrder);
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn add_to_cart(&mut self, product_id: i64) -> CoreResult<()> {
        self.mutate_active_cart(|cart, inventory| cart::add_item(cart, inventory, product_id))
    }

    pub fn change_cart_quantity(&mut self, product_id: i64, delta: i64) -> CoreResult<()> {
        self.mutate_active_cart(|cart, inventory| {
            cart::change_quantity(cart, inventory, product_id, delta)
        })
    }

    pub fn remove_from_cart(&mut self, product_id: i64) -> CoreResult<()> {
        self.mutate_active_cart(|cart, inventory| cart::remove_item(cart, inventory, product_id))
    }

    /// Empties the active cart, restoring stock, and drops the discount.
    pub fn clear_cart(&mut self) -> CoreResult<()> {
        self.mutate_active_cart(cart::clear)?;
        self.discount = Discount::None;
        Ok(())
    }

    /// Sets the pending discount. Amounts are in the active currency.
    pub fn set_discount(&mut self, input: Discount) -> CoreResult<()> {
        validation::validate_discount(&input)?;

        self.discount = match input {
            Discount::Amount(value) => {
                Discount::Amount(to_canonical(value, self.settings.currency))
            }
            other => other,
        };
        Ok(())
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Pays for the active order.
    ///
    /// ## Errors
    /// - `CustomerNotFound` for an unknown customer id
    /// - `NoActiveOrder` when nothing is selected
    /// - `EmptyCart` when the active cart has no lines
    pub fn pay(
        &mut self,
        method: PaymentMethod,
        customer_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> CoreResult<Invoice> {
        let customer = match customer_id {
            Some(id) => Some(
                self.customers
                    .iter()
                    .find(|c| c.id == id)
                    .ok_or(CoreError::CustomerNotFound(id))?,
            ),
            None => None,
        };

        let cart_collection = self.active_cart_collection();
        let cart = self.router.require_mut(&mut self.tables, &mut self.takeaway)?;
        let pricing = pricing::price(cart, &self.discount, self.settings.tax_rate);
        let payment = Payment {
            method,
            customer,
            tax_rate: self.settings.tax_rate,
            currency: self.settings.currency,
            now,
        };
        let invoice = invoice::finalize_payment(cart, &pricing, payment, &mut self.invoices)?;

        self.router.clear();
        self.discount = Discount::None;
        self.refresh_table_totals();
        self.mark(Collection::Invoices);
        self.mark(Collection::ActiveOrder);
        if let Some(collection) = cart_collection {
            self.mark(collection);
        }
        Ok(invoice)
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn add_customer(&mut self, draft: &CustomerDraft) -> CoreResult<Customer> {
        validation::validate_customer_draft(draft)?;

        let customer = Customer {
            id: self.customers.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            name: draft.name.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            email: normalize_email(draft.email.as_deref()),
        };
        self.customers.push(customer.clone());
        self.mark(Collection::Customers);
        Ok(customer)
    }

    /// Edits a customer. Existing invoices keep the old name copy.
    pub fn edit_customer(&mut self, id: i64, draft: &CustomerDraft) -> CoreResult<Customer> {
        validation::validate_customer_draft(draft)?;

        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CustomerNotFound(id))?;
        customer.name = draft.name.trim().to_string();
        customer.phone = draft.phone.trim().to_string();
        customer.email = normalize_email(draft.email.as_deref());
        let customer = customer.clone();

        self.mark(Collection::Customers);
        Ok(customer)
    }

    pub fn delete_customer(&mut self, id: i64) -> CoreResult<Customer> {
        let index = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CustomerNotFound(id))?;
        let removed = self.customers.remove(index);
        self.mark(Collection::Customers);
        Ok(removed)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Switches the display currency. Stored prices are untouched.
    pub fn set_currency(&mut self, currency: Currency) {
        self.settings.currency = currency;
        self.mark(Collection::Settings);
    }

    pub fn set_tax_rate(&mut self, rate: TaxRate) -> CoreResult<()> {
        validation::validate_tax_rate_bps(rate.bps())?;

        self.settings.tax_rate = rate;
        self.refresh_table_totals();
        self.mark(Collection::Settings);
        self.mark(Collection::Tables);
        Ok(())
    }

    pub fn set_store_field(&mut self, field: ProfileField, value: String) {
        self.settings.store.set(field, value);
        self.mark(Collection::Settings);
    }

    pub fn toggle_language(&mut self) {
        self.settings.language = self.settings.language.toggled();
        self.mark(Collection::Settings);
    }

    // =========================================================================
    // Persistence Hooks
    // =========================================================================

    /// Drains the set of collections changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<Collection> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    /// Serializes one collection as JSON.
    pub fn snapshot(&self, collection: Collection) -> serde_json::Result<String> {
        match collection {
            Collection::Products => serde_json::to_string(&self.inventory),
            Collection::Categories => serde_json::to_string(&self.categories),
            Collection::Tables => serde_json::to_string(&self.tables),
            Collection::Invoices => serde_json::to_string(&self.invoices),
            Collection::Customers => serde_json::to_string(&self.customers),
            Collection::ActiveOrder => serde_json::to_string(&self.router),
            Collection::TakeawayCart => serde_json::to_string(&self.takeaway),
            Collection::Settings => serde_json::to_string(&self.settings),
        }
    }

    /// Replaces one collection with a stored JSON value.
    ///
    /// On a parse error the engine is left unchanged. Restoring does not
    /// mark anything dirty.
    pub fn restore(&mut self, collection: Collection, json: &str) -> serde_json::Result<()> {
        match collection {
            Collection::Products => self.inventory = parse(json)?,
            Collection::Categories => self.categories = parse(json)?,
            Collection::Tables => self.tables = parse(json)?,
            Collection::Invoices => self.invoices = parse(json)?,
            Collection::Customers => self.customers = parse(json)?,
            Collection::ActiveOrder => self.router = parse(json)?,
            Collection::TakeawayCart => self.takeaway = parse(json)?,
            Collection::Settings => self.settings = parse(json)?,
        }
        if matches!(collection, Collection::Tables | Collection::Settings) {
            self.refresh_table_totals();
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn mark(&mut self, collection: Collection) {
        self.dirty.insert(collection);
    }

    fn open_carts(&self) -> impl Iterator<Item = &Cart> {
        self.tables
            .iter()
            .map(|t| &t.cart)
            .chain(std::iter::once(&self.takeaway))
    }

    /// Collection that owns the active cart, if any.
    fn active_cart_collection(&self) -> Option<Collection> {
        match self.router.active() {
            ActiveOrder::None => None,
            ActiveOrder::Table(_) => Some(Collection::Tables),
            ActiveOrder::Takeaway => Some(Collection::TakeawayCart),
        }
    }

    fn mutate_active_cart<R>(
        &mut self,
        f: impl FnOnce(&mut Cart, &mut Inventory) -> CoreResult<R>,
    ) -> CoreResult<R> {
        let cart = self.router.require_mut(&mut self.tables, &mut self.takeaway)?;
        let result = f(cart, &mut self.inventory)?;

        self.refresh_table_totals();
        self.mark(Collection::Products);
        if let Some(collection) = self.active_cart_collection() {
            self.mark(collection);
        }
        Ok(result)
    }

    /// Re-prices each table with no discount at the current tax rate.
    fn refresh_table_totals(&mut self) {
        let rate = self.settings.tax_rate;
        for table in &mut self.tables {
            table.total = pricing::price(&table.cart, &Discount::None, rate).total;
        }
    }
}

fn parse<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    serde_json::from_str(json)
}

fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn product_draft(name: &str, price: i64, quantity: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: "General".to_string(),
            price: Money::from_major(price),
            quantity,
            image: None,
        }
    }

    fn engine_with_product(price: i64, stock: i64) -> (PosEngine, i64) {
        let mut engine = PosEngine::default();
        let p = engine.add_product(&product_draft("P", price, stock)).unwrap();
        engine.take_dirty();
        (engine, p.id)
    }

    fn stock(engine: &PosEngine, id: i64) -> i64 {
        engine.product(id).unwrap().quantity
    }

    #[test]
    fn test_reference_scenario() {
        let (mut engine, p) = engine_with_product(10, 5);
        let table = engine.add_table(&TableDraft { name: "T1".to_string(), seats: 4 }).unwrap();
        engine.select_table(table.id).unwrap();

        engine.add_to_cart(p).unwrap();
        assert_eq!(engine.active_cart().units_of(p), 1);
        assert_eq!(stock(&engine, p), 4);

        engine.change_cart_quantity(p, 2).unwrap();
        assert_eq!(engine.active_cart().units_of(p), 3);
        assert_eq!(stock(&engine, p), 2);

        engine.remove_from_cart(p).unwrap();
        assert!(engine.active_cart().is_empty());
        assert_eq!(stock(&engine, p), 5);

        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        let invoice = engine.pay(PaymentMethod::Cash, None, now()).unwrap();

        assert_eq!(invoice.discount, Money::zero());
        assert_eq!(invoice.subtotal, Money::from_major(10));
        assert_eq!(invoice.tax, Money::from_major(10).calculate_tax(TaxRate::default()));
        assert_eq!(invoice.total, Money::from_minor(1150));
        assert_eq!(stock(&engine, p), 4);
        assert!(engine.takeaway().is_empty());
        assert_eq!(engine.active_order(), ActiveOrder::None);
        assert_eq!(engine.invoices().len(), 1);
    }

    #[test]
    fn test_mutations_without_active_order_fail() {
        let (mut engine, p) = engine_with_product(10, 5);

        assert_eq!(engine.add_to_cart(p), Err(CoreError::NoActiveOrder));
        assert_eq!(engine.clear_cart(), Err(CoreError::NoActiveOrder));
        assert!(engine.active_cart().is_empty());
        assert_eq!(stock(&engine, p), 5);
        assert!(engine.take_dirty().is_empty());
    }

    #[test]
    fn test_out_of_stock_add_is_rejected() {
        let (mut engine, p) = engine_with_product(10, 0);
        engine.select_takeaway();

        assert!(matches!(engine.add_to_cart(p), Err(CoreError::OutOfStock { .. })));
        assert!(engine.takeaway().is_empty());
    }

    #[test]
    fn test_conservation_across_tables_and_takeaway() {
        let (mut engine, p) = engine_with_product(3, 6);
        let t1 = engine.add_table(&TableDraft { name: "A".to_string(), seats: 2 }).unwrap();
        let t2 = engine.add_table(&TableDraft { name: "B".to_string(), seats: 2 }).unwrap();

        let held = |e: &PosEngine| {
            e.tables().iter().map(|t| t.cart.units_of(p)).sum::<i64>()
                + e.takeaway().units_of(p)
                + stock(e, p)
        };
        let before = held(&engine);

        engine.select_table(t1.id).unwrap();
        engine.add_to_cart(p).unwrap();
        engine.change_cart_quantity(p, 2).unwrap();
        engine.select_table(t2.id).unwrap();
        engine.add_to_cart(p).unwrap();
        let _ = engine.change_cart_quantity(p, 10);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        let _ = engine.add_to_cart(p);
        engine.select_table(t1.id).unwrap();
        engine.change_cart_quantity(p, -1).unwrap();
        engine.clear_cart().unwrap();

        assert_eq!(held(&engine), before);
    }

    #[test]
    fn test_table_status_total_and_delete_guard() {
        let (mut engine, p) = engine_with_product(10, 5);
        let table = engine.add_table(&TableDraft { name: "T".to_string(), seats: 4 }).unwrap();
        engine.select_table(table.id).unwrap();
        engine.add_to_cart(p).unwrap();

        let t = engine.table(table.id).unwrap();
        assert!(t.is_occupied());
        assert_eq!(t.total, Money::from_minor(1150));

        assert_eq!(
            engine.delete_table(table.id),
            Err(CoreError::TableOccupied { table_id: table.id })
        );

        engine.set_tax_rate(TaxRate::zero()).unwrap();
        assert_eq!(engine.table(table.id).unwrap().total, Money::from_major(10));

        engine.clear_cart().unwrap();
        engine.delete_table(table.id).unwrap();
        assert!(engine.tables().is_empty());
        assert_eq!(engine.active_order(), ActiveOrder::None);
    }

    #[test]
    fn test_discount_then_tax() {
        let (mut engine, p) = engine_with_product(100, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        engine
            .set_discount(Discount::Percentage(Decimal::from(10)))
            .unwrap();

        let pricing = engine.pricing();
        assert_eq!(pricing.discount, Money::from_major(10));
        assert_eq!(pricing.taxable_base, Money::from_major(90));
        assert_eq!(pricing.tax, Money::from_minor(1350));
        assert_eq!(pricing.total, Money::from_minor(10350));
        assert_eq!(engine.pricing(), pricing);
    }

    #[test]
    fn test_amount_discount_is_entered_in_display_currency() {
        let (mut engine, p) = engine_with_product(100, 5);
        engine.set_currency(Currency::Usd);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();

        engine.set_discount(Discount::Amount(Money::from_minor(270))).unwrap();
        assert_eq!(engine.discount(), Discount::Amount(Money::from_major(10)));

        assert!(engine.set_discount(Discount::Amount(Money::from_major(-1))).is_err());
    }

    #[test]
    fn test_extreme_discounts_keep_pricing_usable() {
        let (mut engine, p) = engine_with_product(100, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();

        let huge_pct = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        engine.set_discount(Discount::Percentage(huge_pct)).unwrap();
        let pricing = engine.pricing();
        assert_eq!(pricing.discount, Money::from_major(100));
        assert_eq!(pricing.total, Money::zero());

        engine.set_currency(Currency::Yer);
        let err = engine
            .set_discount(Discount::Amount(Money::new(Decimal::MAX)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(engine.discount(), Discount::Percentage(huge_pct));
    }

    #[test]
    fn test_oversized_product_input_is_rejected() {
        let (mut engine, p) = engine_with_product(10, 5);

        let pricey = product_draft("Gold", crate::MAX_PRICE + 1, 1);
        assert!(matches!(engine.add_product(&pricey), Err(CoreError::Validation(_))));

        let hoard = product_draft("P", 10, i64::MAX);
        assert!(matches!(engine.edit_product(p, &hoard), Err(CoreError::Validation(_))));

        assert_eq!(engine.products().len(), 1);
        assert_eq!(stock(&engine, p), 5);
        assert!(engine.take_dirty().is_empty());
    }

    #[test]
    fn test_cart_quantity_overflow_changes_nothing() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        engine.take_dirty();

        let err = engine.change_cart_quantity(p, i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert_eq!(engine.active_cart().units_of(p), 1);
        assert_eq!(stock(&engine, p), 4);
        assert!(engine.take_dirty().is_empty());
    }

    #[test]
    fn test_discount_reset_on_clear_and_pay() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        engine.set_discount(Discount::Percentage(Decimal::from(5))).unwrap();

        engine.clear_cart().unwrap();
        assert!(engine.discount().is_none());

        engine.add_to_cart(p).unwrap();
        engine.set_discount(Discount::Percentage(Decimal::from(5))).unwrap();
        let invoice = engine.pay(PaymentMethod::Card, None, now()).unwrap();
        assert_eq!(invoice.discount, Money::from_minor(50));
        assert!(engine.discount().is_none());
    }

    #[test]
    fn test_invoice_immutable_after_pay() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        let invoice = engine.pay(PaymentMethod::Cash, None, now()).unwrap();

        engine
            .edit_product(p, &product_draft("Renamed", 99, 1))
            .unwrap();
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        engine.pay(PaymentMethod::Cash, None, now()).unwrap();

        assert_eq!(engine.invoice(&invoice.id), Some(&invoice));
        assert_eq!(engine.invoices()[1], invoice);
        assert_eq!(engine.invoices()[1].items[0].name, "P");
    }

    #[test]
    fn test_customer_rename_keeps_invoice_name() {
        let (mut engine, p) = engine_with_product(10, 5);
        let draft = CustomerDraft {
            name: "Omar".to_string(),
            phone: "0500000001".to_string(),
            email: Some(" ".to_string()),
        };
        let customer = engine.add_customer(&draft).unwrap();
        assert_eq!(customer.email, None);

        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();
        let invoice = engine.pay(PaymentMethod::Cash, Some(customer.id), now()).unwrap();

        engine
            .edit_customer(customer.id, &CustomerDraft { name: "Omar K".to_string(), ..draft })
            .unwrap();
        assert_eq!(
            engine.invoice(&invoice.id).unwrap().customer_name.as_deref(),
            Some("Omar")
        );
    }

    #[test]
    fn test_pay_with_unknown_customer_changes_nothing() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();

        assert_eq!(
            engine.pay(PaymentMethod::Cash, Some(42), now()),
            Err(CoreError::CustomerNotFound(42))
        );
        assert_eq!(engine.takeaway().units_of(p), 1);
        assert!(engine.invoices().is_empty());
    }

    #[test]
    fn test_pay_empty_cart() {
        let (mut engine, _) = engine_with_product(10, 5);
        engine.select_takeaway();
        assert_eq!(
            engine.pay(PaymentMethod::Cash, None, now()),
            Err(CoreError::EmptyCart)
        );
        assert_eq!(engine.active_order(), ActiveOrder::Takeaway);
    }

    #[test]
    fn test_delete_product_in_open_order() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();

        assert_eq!(
            engine.delete_product(p),
            Err(CoreError::ProductInOpenOrder { product_id: p })
        );
        engine.clear_cart().unwrap();
        engine.delete_product(p).unwrap();
        assert!(engine.products().is_empty());
    }

    #[test]
    fn test_currency_switch_does_not_rewrite_products() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.set_currency(Currency::Yer);

        assert_eq!(engine.product(p).unwrap().price, Money::from_major(10));
        assert_eq!(engine.catalog()[0].price, Money::from_major(1431));
    }

    #[test]
    fn test_dirty_tracking() {
        let (mut engine, p) = engine_with_product(10, 5);
        engine.select_takeaway();
        engine.add_to_cart(p).unwrap();

        assert_eq!(
            engine.take_dirty(),
            vec![
                Collection::Products,
                Collection::ActiveOrder,
                Collection::TakeawayCart
            ]
        );
        assert!(engine.take_dirty().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let (mut engine, p) = engine_with_product(10, 5);
        let table = engine.add_table(&TableDraft { name: "T".to_string(), seats: 2 }).unwrap();
        engine.select_table(table.id).unwrap();
        engine.add_to_cart(p).unwrap();

        let mut restored = PosEngine::default();
        for collection in Collection::ALL {
            let json = engine.snapshot(collection).unwrap();
            restored.restore(collection, &json).unwrap();
        }

        assert_eq!(restored.products(), engine.products());
        assert_eq!(restored.tables(), engine.tables());
        assert_eq!(restored.active_order(), ActiveOrder::Table(table.id));
        assert!(restored.take_dirty().is_empty());
    }

    #[test]
    fn test_restore_bad_json_leaves_engine_unchanged() {
        let (mut engine, _) = engine_with_product(10, 5);
        assert!(engine.restore(Collection::Products, "{not json").is_err());
        assert_eq!(engine.products().len(), 1);
    }

    #[test]
    fn test_ids_are_max_plus_one() {
        let mut engine = PosEngine::default();
        let a = engine.add_product(&product_draft("A", 1, 1)).unwrap();
        let b = engine.add_product(&product_draft("B", 1, 1)).unwrap();
        engine.delete_product(a.id).unwrap();
        let c = engine.add_product(&product_draft("C", 1, 1)).unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn test_select_unknown_table() {
        let mut engine = PosEngine::default();
        assert_eq!(engine.select_table(5), Err(CoreError::TableNotFound(5)));
        assert_eq!(engine.active_order(), ActiveOrder::None);

        engine.select_takeaway();
        assert!(engine.select_table(5).is_err());
        assert_eq!(engine.active_order(), ActiveOrder::Takeaway);
    }

    #[test]
    fn test_settings_operations() {
        let mut engine = PosEngine::default();
        engine.set_store_field(ProfileField::Name, "Corner Cafe".to_string());
        engine.toggle_language();

        assert_eq!(engine.settings().store.name, "Corner Cafe");
        assert_eq!(engine.settings().language, crate::settings::Language::En);
        assert!(engine.set_tax_rate(TaxRate::from_bps(20_000)).is_err());
    }
}
