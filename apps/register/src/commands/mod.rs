//! # Register Commands Module
//!
//! Every operation the register UI can invoke, and the dispatcher that
//! routes a named command with JSON arguments to it.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch)
//! ├── product.rs   ◄─── Catalog, product CRUD, categories, images
//! ├── order.rs     ◄─── Tables and active-order selection
//! ├── cart.rs      ◄─── Cart of the active order, discount
//! ├── sale.rs      ◄─── Payment, receipts, invoice history
//! ├── customer.rs  ◄─── Customer CRUD
//! ├── settings.rs  ◄─── Currency, tax, store profile, language
//! └── report.rs    ◄─── Sales reports
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  {"id": 7, "command": "add_to_cart", "args": {"productId": 3}}          │
//! │         │                                                               │
//! │         │ (one JSON object per line)                                    │
//! │         ▼                                                               │
//! │  dispatch(ctx, request)                                                 │
//! │         │                                                               │
//! │         ├── args::<ProductIdArgs>() ── malformed ──► BAD_REQUEST       │
//! │         ▼                                                               │
//! │  cart::add_to_cart(&ctx.session, product_id)                            │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"id": 7, "ok": true, "data": { "items": [...], "totals": {...} }}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands run one at a time against the session; each mutation persists
//! before the next command starts.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod sale;
pub mod settings;

use std::sync::Arc;

use cashier_core::{
    CustomerDraft, DateRange, Discount, ImagePromptStyle, PaymentMethod, ProductDraft,
    ProfileField, TableDraft,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::external::{IdentityProvider, ImageGenerator};
use crate::state::SessionState;

/// Everything a command may need.
#[derive(Clone)]
pub struct CommandContext {
    pub session: SessionState,
    pub images: Arc<dyn ImageGenerator>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// One command invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    /// Echoed back so callers can match replies.
    #[serde(default)]
    pub id: Option<Value>,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// Reply to one [`CommandRequest`].
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl CommandResponse {
    pub fn from_result(id: Option<Value>, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => CommandResponse {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => CommandResponse {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductIdArgs {
    product_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterArgs {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    search: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditArgs<D> {
    id: i64,
    draft: D,
}

#[derive(Debug, Deserialize)]
struct NameArgs {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameArgs {
    old_name: String,
    new_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageArgs {
    product_id: i64,
    #[serde(default)]
    style: Option<ImagePromptStyle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityArgs {
    product_id: i64,
    delta: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayArgs {
    method: PaymentMethod,
    #[serde(default)]
    customer_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TermArgs {
    #[serde(default)]
    term: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceIdArgs {
    invoice_id: String,
}

#[derive(Debug, Deserialize)]
struct CodeArgs {
    code: String,
}

#[derive(Debug, Deserialize)]
struct TaxArgs {
    percent: Decimal,
}

#[derive(Debug, Deserialize)]
struct StoreFieldArgs {
    field: ProfileField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RangeArgs {
    #[serde(default)]
    range: DateRange,
}

fn args<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    // A command sent without arguments reads as an empty object
    let value = if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    };
    Ok(serde_json::from_value(value)?)
}

fn reply<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize response: {e}")))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one command and returns its JSON result.
pub async fn dispatch(ctx: &CommandContext, request: CommandRequest) -> Result<Value, ApiError> {
    let state = &ctx.session;
    let a = request.args;

    match request.command.as_str() {
        // Products & categories
        "list_products" => reply(product::list_products(state)),
        "filter_products" => {
            let FilterArgs { category, search } = args(a)?;
            reply(product::filter_products(state, category, search))
        }
        "get_product" => reply(product::get_product(state, args::<IdArgs>(a)?.id)?),
        "add_product" => reply(product::add_product(state, args::<ProductDraft>(a)?)?),
        "edit_product" => {
            let EditArgs { id, draft } = args::<EditArgs<ProductDraft>>(a)?;
            reply(product::edit_product(state, id, draft)?)
        }
        "delete_product" => reply(product::delete_product(state, args::<IdArgs>(a)?.id)?),
        "generate_product_image" => {
            let ImageArgs { product_id, style } = args(a)?;
            let style = style.unwrap_or(ImagePromptStyle::Photo);
            reply(
                product::generate_product_image(state, ctx.images.as_ref(), product_id, style)
                    .await?,
            )
        }
        "list_categories" => reply(product::list_categories(state)),
        "add_category" => reply(product::add_category(state, args::<NameArgs>(a)?.name)?),
        "rename_category" => {
            let RenameArgs { old_name, new_name } = args(a)?;
            reply(product::rename_category(state, old_name, new_name))
        }
        "delete_category" => reply(product::delete_category(state, args::<NameArgs>(a)?.name)?),

        // Tables & active order
        "list_tables" => reply(order::list_tables(state)),
        "add_table" => reply(order::add_table(state, args::<TableDraft>(a)?)?),
        "edit_table" => {
            let EditArgs { id, draft } = args::<EditArgs<TableDraft>>(a)?;
            reply(order::edit_table(state, id, draft)?)
        }
        "delete_table" => reply(order::delete_table(state, args::<IdArgs>(a)?.id)?),
        "get_active_order" => reply(order::get_active_order(state)),
        "select_table" => reply(order::select_table(state, args::<IdArgs>(a)?.id)?),
        "select_takeaway" => reply(order::select_takeaway(state)),
        "clear_active_order" => reply(order::clear_active_order(state)),

        // Cart
        "get_cart" => reply(cart::get_cart(state)),
        "add_to_cart" => reply(cart::add_to_cart(state, args::<ProductIdArgs>(a)?.product_id)?),
        "change_cart_quantity" => {
            let QuantityArgs { product_id, delta } = args(a)?;
            reply(cart::change_cart_quantity(state, product_id, delta)?)
        }
        "remove_from_cart" => reply(cart::remove_from_cart(
            state,
            args::<ProductIdArgs>(a)?.product_id,
        )?),
        "clear_cart" => reply(cart::clear_cart(state)?),
        "set_discount" => reply(cart::set_discount(state, args::<Discount>(a)?)?),

        // Sales
        "pay" => {
            let PayArgs { method, customer_id } = args(a)?;
            reply(sale::pay(state, method, customer_id)?)
        }
        "list_invoices" => reply(sale::list_invoices(state)),
        "search_invoices" => reply(sale::search_invoices(state, args::<TermArgs>(a)?.term)),
        "get_receipt" => reply(sale::get_receipt(state, args::<InvoiceIdArgs>(a)?.invoice_id)?),

        // Customers
        "list_customers" => reply(customer::list_customers(state)),
        "add_customer" => reply(customer::add_customer(state, args::<CustomerDraft>(a)?)?),
        "edit_customer" => {
            let EditArgs { id, draft } = args::<EditArgs<CustomerDraft>>(a)?;
            reply(customer::edit_customer(state, id, draft)?)
        }
        "delete_customer" => reply(customer::delete_customer(state, args::<IdArgs>(a)?.id)?),

        // Settings
        "get_settings" => reply(settings::get_settings(state)),
        "set_currency" => reply(settings::set_currency(state, args::<CodeArgs>(a)?.code)?),
        "set_tax_rate" => reply(settings::set_tax_rate(state, args::<TaxArgs>(a)?.percent)?),
        "set_store_field" => {
            let StoreFieldArgs { field, value } = args(a)?;
            reply(settings::set_store_field(state, field, value))
        }
        "toggle_language" => reply(settings::toggle_language(state)),
        "current_user" => reply(settings::current_user(ctx.identity.as_ref())),
        "session_status" => reply(settings::session_status(state)),

        // Reports
        "sales_report" => reply(report::sales_report(state, args::<RangeArgs>(a)?.range)),

        other => Err(ApiError::bad_request(format!("Unknown command: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::external::{ImageError, NoImageGenerator, StaticIdentity};
    use crate::state::Session;
    use cashier_core::Settings;
    use serde_json::json;

    fn ctx() -> CommandContext {
        CommandContext {
            session: SessionState::new(Session::new(Settings::default(), None)),
            images: Arc::new(NoImageGenerator),
            identity: Arc::new(StaticIdentity::default()),
        }
    }

    async fn call(ctx: &CommandContext, command: &str, args: Value) -> Result<Value, ApiError> {
        let request = CommandRequest {
            id: None,
            command: command.to_string(),
            args,
        };
        dispatch(ctx, request).await
    }

    #[tokio::test]
    async fn test_order_to_receipt() {
        let ctx = ctx();
        let tea = call(
            &ctx,
            "add_product",
            json!({"name": "Tea", "category": "Drinks", "price": "10", "quantity": 4}),
        )
        .await
        .unwrap();
        let tea_id = tea["id"].as_i64().unwrap();

        let table = call(&ctx, "add_table", json!({"name": "T1"})).await.unwrap();
        assert_eq!(table["seats"], 4);
        call(&ctx, "select_table", json!({"id": table["id"]})).await.unwrap();

        let cart = call(&ctx, "add_to_cart", json!({"productId": tea_id})).await.unwrap();
        assert_eq!(cart["activeOrder"], json!({"kind": "table", "tableId": 1}));
        assert_eq!(cart["formattedTotal"], "11.50 ر.س");

        let receipt = call(&ctx, "pay", json!({"method": "cash"})).await.unwrap();
        assert_eq!(receipt["formattedTotal"], "11.50 ر.س");
        assert_eq!(receipt["paymentMethod"], "cash");

        let tables = call(&ctx, "list_tables", Value::Null).await.unwrap();
        assert_eq!(tables[0]["status"], "available");
    }

    #[tokio::test]
    async fn test_discount_argument_shape() {
        let ctx = ctx();
        call(&ctx, "select_takeaway", Value::Null).await.unwrap();
        let cart = call(&ctx, "set_discount", json!({"type": "percentage", "value": "10"}))
            .await
            .unwrap();
        assert_eq!(cart["discount"]["type"], "percentage");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        let ctx = ctx();
        let err = call(&ctx, "launch_rockets", Value::Null).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let err = call(&ctx, "add_to_cart", json!({"id": 1})).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[tokio::test]
    async fn test_business_errors_pass_through() {
        let ctx = ctx();
        let err = call(&ctx, "add_to_cart", json!({"productId": 1})).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveOrder);

        let err = call(&ctx, "generate_product_image", json!({"productId": 1}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    struct StubImages;

    #[async_trait::async_trait]
    impl ImageGenerator for StubImages {
        async fn generate_image(&self, _prompt: &str) -> Result<String, ImageError> {
            Ok("data:image/png;base64,AAAA".to_string())
        }
    }

    #[tokio::test]
    async fn test_context_generator_is_used() {
        let stock = ctx();
        call(
            &stock,
            "add_product",
            json!({"name": "Tea", "category": "Drinks", "price": "10", "quantity": 4}),
        )
        .await
        .unwrap();
        let err = call(&stock, "generate_product_image", json!({"productId": 1}))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageGeneration);

        let wired = CommandContext {
            images: Arc::new(StubImages),
            ..stock
        };
        let product = call(&wired, "generate_product_image", json!({"productId": 1}))
            .await
            .unwrap();
        assert_eq!(product["image"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_response_envelope() {
        let ok = CommandResponse::from_result(Some(json!(7)), Ok(json!([1, 2])));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json, json!({"id": 7, "ok": true, "data": [1, 2]}));

        let failed = CommandResponse::from_result(None, Err(ApiError::bad_request("nope")));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
