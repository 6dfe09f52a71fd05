//! # Sales Reports
//!
//! Aggregates over the invoice ledger for a date range.
//!
//! Range boundaries are measured from UTC midnight of `now`:
//! `Today` starts at that midnight, `Last7Days` seven days before it,
//! `Last30Days` thirty days before it.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Invoice, PaymentMethod};

/// How many products the top-sellers list keeps.
pub const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Last7Days,
    Last30Days,
    #[default]
    All,
}

impl DateRange {
    /// Earliest timestamp included, or `None` for all time.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())?;
        match self {
            DateRange::Today => Some(midnight),
            DateRange::Last7Days => Some(midnight - Duration::days(7)),
            DateRange::Last30Days => Some(midnight - Duration::days(30)),
            DateRange::All => None,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start(now).map_or(true, |start| at >= start)
    }
}

/// Units sold of one product within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    /// Name as it appeared on the first invoice seen.
    pub name: String,
    pub units_sold: i64,
}

/// Sales figures for a date range. Amounts are canonical.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub range: DateRange,
    pub total_revenue: Money,
    pub total_sales: usize,
    pub average_sale: Money,
    pub cash_revenue: Money,
    pub card_revenue: Money,
    pub top_products: Vec<TopProduct>,
}

/// Builds a report over `invoices` for `range`, relative to `now`.
pub fn sales_report(invoices: &[Invoice], range: DateRange, now: DateTime<Utc>) -> SalesReport {
    let selected: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| range.contains(i.created_at, now))
        .collect();

    let revenue_by = |method: PaymentMethod| -> Money {
        selected
            .iter()
            .filter(|i| i.payment_method == method)
            .map(|i| i.total)
            .sum()
    };

    let total_revenue: Money = selected.iter().map(|i| i.total).sum();
    let total_sales = selected.len();
    let average_sale = if total_sales == 0 {
        Money::zero()
    } else {
        Money::new(total_revenue.amount() / Decimal::from(total_sales))
    };

    SalesReport {
        range,
        total_revenue,
        total_sales,
        average_sale,
        cash_revenue: revenue_by(PaymentMethod::Cash),
        card_revenue: revenue_by(PaymentMethod::Card),
        top_products: top_products(&selected),
    }
}

fn top_products(invoices: &[&Invoice]) -> Vec<TopProduct> {
    let mut tally: Vec<TopProduct> = Vec::new();
    for item in invoices.iter().flat_map(|i| i.items.iter()) {
        match tally.iter_mut().find(|t| t.product_id == item.product_id) {
            Some(entry) => entry.units_sold += item.cart_quantity,
            None => tally.push(TopProduct {
                product_id: item.product_id,
                name: item.name.clone(),
                units_sold: item.cart_quantity,
            }),
        }
    }

    // stable: ties keep first-seen order
    tally.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    tally.truncate(TOP_PRODUCTS);
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::currency::Currency;
    use crate::types::TaxRate;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 15, 30, 0).unwrap()
    }

    fn invoice(
        id: &str,
        at: DateTime<Utc>,
        method: PaymentMethod,
        total: i64,
        lines: &[(i64, i64)],
    ) -> Invoice {
        Invoice {
            id: id.to_string(),
            created_at: at,
            items: lines
                .iter()
                .map(|&(product_id, qty)| CartItem {
                    product_id,
                    name: format!("P{product_id}"),
                    category: "General".to_string(),
                    price: Money::from_major(1),
                    image: String::new(),
                    cart_quantity: qty,
                })
                .collect(),
            subtotal: Money::from_major(total),
            discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_major(total),
            tax_rate: TaxRate::zero(),
            currency: Currency::Sar,
            payment_method: method,
            customer_id: None,
            customer_name: None,
        }
    }

    fn ledger() -> Vec<Invoice> {
        vec![
            invoice("4", now() - Duration::hours(1), PaymentMethod::Cash, 30, &[(1, 3)]),
            invoice("3", now() - Duration::days(3), PaymentMethod::Card, 20, &[(2, 5), (1, 1)]),
            invoice("2", now() - Duration::days(20), PaymentMethod::Cash, 10, &[(3, 9)]),
            invoice("1", now() - Duration::days(90), PaymentMethod::Card, 40, &[(4, 1)]),
        ]
    }

    #[test]
    fn test_all_time_report() {
        let report = sales_report(&ledger(), DateRange::All, now());

        assert_eq!(report.total_sales, 4);
        assert_eq!(report.total_revenue, Money::from_major(100));
        assert_eq!(report.average_sale, Money::from_major(25));
        assert_eq!(report.cash_revenue, Money::from_major(40));
        assert_eq!(report.card_revenue, Money::from_major(60));
        assert_eq!(report.top_products[0].product_id, 3);
        assert_eq!(report.top_products[1].product_id, 2);
        assert_eq!(report.top_products[2].units_sold, 4);
    }

    #[test]
    fn test_ranges_from_midnight() {
        let today = sales_report(&ledger(), DateRange::Today, now());
        assert_eq!(today.total_sales, 1);

        let week = sales_report(&ledger(), DateRange::Last7Days, now());
        assert_eq!(week.total_sales, 2);

        let month = sales_report(&ledger(), DateRange::Last30Days, now());
        assert_eq!(month.total_sales, 3);
    }

    #[test]
    fn test_empty_report() {
        let report = sales_report(&[], DateRange::Today, now());
        assert_eq!(report.total_sales, 0);
        assert_eq!(report.average_sale, Money::zero());
        assert!(report.top_products.is_empty());
    }

    #[test]
    fn test_top_products_capped_at_five() {
        let lines: Vec<(i64, i64)> = (1..=8).map(|id| (id, id)).collect();
        let invoices = vec![invoice("1", now(), PaymentMethod::Cash, 1, &lines)];

        let report = sales_report(&invoices, DateRange::All, now());
        assert_eq!(report.top_products.len(), TOP_PRODUCTS);
        assert_eq!(report.top_products[0].product_id, 8);
    }
}
