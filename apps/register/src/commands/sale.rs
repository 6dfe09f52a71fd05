//! # Sale Commands
//!
//! Payment, receipts and the invoice history.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pay { method: "cash", customerId: 2 }                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  engine.pay ── NO_ACTIVE_ORDER / EMPTY_CART / NOT_FOUND ──► error      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Invoice appended, cart emptied (stock stays sold),                    │
//! │  active order cleared, discount dropped                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReceiptResponse (amounts in the currency active at payment)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::currency::{format_amount, to_display};
use cashier_core::{Currency, Invoice, Money, PaymentMethod, StoreProfile};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SessionState;

/// A printable receipt for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub invoice_id: String,
    pub created_at: DateTime<Utc>,
    pub store: StoreProfile,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub currency: Currency,
    pub items: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    /// Percentage applied at payment, e.g. `15.00`.
    pub tax_percent: Decimal,
    pub total: Money,
    pub formatted_total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl ReceiptResponse {
    pub fn new(invoice: &Invoice, store: &StoreProfile) -> Self {
        let currency = invoice.currency;
        let show = |amount: Money| to_display(amount, currency);
        let total = show(invoice.total);

        ReceiptResponse {
            invoice_id: invoice.id.clone(),
            created_at: invoice.created_at,
            store: store.clone(),
            customer_name: invoice.customer_name.clone(),
            payment_method: invoice.payment_method,
            currency,
            items: invoice
                .items
                .iter()
                .map(|item| ReceiptItem {
                    name: item.name.clone(),
                    quantity: item.cart_quantity,
                    unit_price: show(item.price),
                    line_total: show(item.line_total()),
                })
                .collect(),
            subtotal: show(invoice.subtotal),
            discount: show(invoice.discount),
            tax: show(invoice.tax),
            tax_percent: invoice.tax_rate.percentage(),
            total,
            formatted_total: format_amount(total, currency),
        }
    }
}

/// One row of the invoice history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub units: i64,
    pub formatted_total: String,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        InvoiceSummary {
            id: invoice.id.clone(),
            created_at: invoice.created_at,
            customer_name: invoice.customer_name.clone(),
            payment_method: invoice.payment_method,
            units: invoice.units(),
            formatted_total: format_amount(
                to_display(invoice.total, invoice.currency),
                invoice.currency,
            ),
        }
    }
}

/// Pays for the active order and returns its receipt.
pub fn pay(
    state: &SessionState,
    method: PaymentMethod,
    customer_id: Option<i64>,
) -> Result<ReceiptResponse, ApiError> {
    debug!(method = ?method, customer_id = ?customer_id, "pay command");

    let receipt = state.with_engine_mut(|e| {
        let invoice = e.pay(method, customer_id, Utc::now())?;
        Ok::<_, ApiError>(ReceiptResponse::new(&invoice, &e.settings().store))
    })?;

    info!(
        invoice_id = %receipt.invoice_id,
        total = %receipt.formatted_total,
        items = receipt.items.len(),
        "Invoice issued"
    );
    Ok(receipt)
}

/// Invoice history, newest first.
pub fn list_invoices(state: &SessionState) -> Vec<InvoiceSummary> {
    debug!("list_invoices command");
    state.with_engine(|e| e.invoices().iter().map(InvoiceSummary::from).collect())
}

/// Invoices whose id contains `term`.
pub fn search_invoices(state: &SessionState, term: String) -> Vec<InvoiceSummary> {
    debug!(term = %term, "search_invoices command");
    state.with_engine(|e| {
        e.search_invoices(&term)
            .into_iter()
            .map(InvoiceSummary::from)
            .collect()
    })
}

/// Re-renders the receipt of a past invoice.
pub fn get_receipt(state: &SessionState, invoice_id: String) -> Result<ReceiptResponse, ApiError> {
    debug!(invoice_id = %invoice_id, "get_receipt command");
    state.with_engine(|e| {
        e.invoice(&invoice_id)
            .map(|invoice| ReceiptResponse::new(invoice, &e.settings().store))
            .ok_or_else(|| ApiError::not_found("Invoice", &invoice_id))
    })
}
