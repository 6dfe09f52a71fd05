//! # Report Commands

use cashier_core::currency::{format_amount, to_display};
use cashier_core::reports::TopProduct;
use cashier_core::{Currency, DateRange, Money};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::state::SessionState;

/// A sales report with every amount in the active currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportResponse {
    pub range: DateRange,
    pub currency: Currency,
    pub total_revenue: Money,
    pub formatted_revenue: String,
    pub total_sales: usize,
    pub average_sale: Money,
    pub cash_revenue: Money,
    pub card_revenue: Money,
    pub top_products: Vec<TopProduct>,
}

/// Sales figures for `range`, measured from now.
pub fn sales_report(state: &SessionState, range: DateRange) -> SalesReportResponse {
    debug!(range = ?range, "sales_report command");
    state.with_engine(|e| {
        let currency = e.settings().currency;
        let report = e.sales_report(range, Utc::now());
        let show = |amount: Money| to_display(amount, currency);
        let total_revenue = show(report.total_revenue);

        SalesReportResponse {
            range: report.range,
            currency,
            total_revenue,
            formatted_revenue: format_amount(total_revenue, currency),
            total_sales: report.total_sales,
            average_sale: show(report.average_sale),
            cash_revenue: show(report.cash_revenue),
            card_revenue: show(report.card_revenue),
            top_products: report.top_products,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Session;
    use cashier_core::{PaymentMethod, ProductDraft, Settings};

    #[test]
    fn test_report_in_display_currency() {
        let state = SessionState::new(Session::new(Settings::default(), None));
        state
            .with_engine_mut(|e| {
                let tea = e.add_product(&ProductDraft {
                    name: "Tea".to_string(),
                    category: "Drinks".to_string(),
                    price: Money::from_major(100),
                    quantity: 10,
                    image: None,
                })?;
                e.select_takeaway();
                e.add_to_cart(tea.id)?;
                e.pay(PaymentMethod::Card, None, Utc::now())
            })
            .unwrap();

        let report = sales_report(&state, DateRange::Today);
        assert_eq!(report.total_sales, 1);
        assert_eq!(report.formatted_revenue, "115.00 ر.س");
        assert_eq!(report.card_revenue, report.total_revenue);
        assert_eq!(report.top_products[0].units_sold, 1);

        state.with_engine_mut(|e| e.set_currency(Currency::Usd));
        let report = sales_report(&state, DateRange::All);
        assert_eq!(report.formatted_revenue, "31.05 $");
    }
}
