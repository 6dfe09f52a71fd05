//! # Product Commands
//!
//! Catalog listing, product CRUD, categories and product images.
//!
//! ## Price Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator types 2.70 while USD is active                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_product { price: "2.70", ... }                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  engine: to_canonical(2.70 USD) → 10 SAR stored                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductView { price: "2.70", formattedPrice: "2.70 $" }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::catalog::image_prompt;
use cashier_core::{ImagePromptStyle, ProductDraft, ProductView};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::external::{check_data_uri, ImageGenerator};
use crate::state::SessionState;

/// Result of renaming a category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameCategoryResponse {
    pub categories: Vec<String>,
    /// Products moved to the new name.
    pub retagged: usize,
}

/// Every product, priced in the active currency.
pub fn list_products(state: &SessionState) -> Vec<ProductView> {
    debug!("list_products command");
    state.with_engine(|e| e.catalog())
}

/// Products in `category` (exact) whose name contains `search`
/// (case-insensitive).
pub fn filter_products(
    state: &SessionState,
    category: Option<String>,
    search: String,
) -> Vec<ProductView> {
    debug!(category = ?category, search = %search, "filter_products command");
    state.with_engine(|e| e.filter_catalog(category.as_deref(), &search))
}

pub fn get_product(state: &SessionState, id: i64) -> Result<ProductView, ApiError> {
    debug!(id, "get_product command");
    state.with_engine(|e| {
        e.product(id)
            .map(|p| ProductView::new(p, e.settings().currency))
            .ok_or_else(|| ApiError::not_found("Product", id))
    })
}

/// Adds a product. `draft.price` is in the active currency.
pub fn add_product(state: &SessionState, draft: ProductDraft) -> Result<ProductView, ApiError> {
    debug!(name = %draft.name, "add_product command");
    let view = state.with_engine_mut(|e| {
        let product = e.add_product(&draft)?;
        Ok::<_, ApiError>(ProductView::new(&product, e.settings().currency))
    })?;
    info!(id = view.id, name = %view.name, "Product added");
    Ok(view)
}

pub fn edit_product(
    state: &SessionState,
    id: i64,
    draft: ProductDraft,
) -> Result<ProductView, ApiError> {
    debug!(id, "edit_product command");
    state.with_engine_mut(|e| {
        let product = e.edit_product(id, &draft)?;
        Ok(ProductView::new(&product, e.settings().currency))
    })
}

/// Deletes a product. Fails while it sits in an open order.
pub fn delete_product(state: &SessionState, id: i64) -> Result<ProductView, ApiError> {
    debug!(id, "delete_product command");
    let view = state.with_engine_mut(|e| {
        let removed = e.delete_product(id)?;
        Ok::<_, ApiError>(ProductView::new(&removed, e.settings().currency))
    })?;
    info!(id, name = %view.name, "Product deleted");
    Ok(view)
}

// =============================================================================
// Categories
// =============================================================================

/// Managed categories plus any product tags, in first-seen order.
pub fn list_categories(state: &SessionState) -> Vec<String> {
    debug!("list_categories command");
    state.with_engine(|e| e.categories())
}

pub fn add_category(state: &SessionState, name: String) -> Result<Vec<String>, ApiError> {
    debug!(name = %name, "add_category command");
    state.with_engine_mut(|e| {
        e.add_category(&name)?;
        Ok(e.categories())
    })
}

pub fn rename_category(
    state: &SessionState,
    old_name: String,
    new_name: String,
) -> RenameCategoryResponse {
    debug!(old = %old_name, new = %new_name, "rename_category command");
    state.with_engine_mut(|e| {
        let retagged = e.rename_category(&old_name, &new_name);
        RenameCategoryResponse {
            categories: e.categories(),
            retagged,
        }
    })
}

pub fn delete_category(state: &SessionState, name: String) -> Result<Vec<String>, ApiError> {
    debug!(name = %name, "delete_category command");
    state.with_engine_mut(|e| {
        e.delete_category(&name)?;
        Ok(e.categories())
    })
}

// =============================================================================
// Images
// =============================================================================

/// Generates a picture for a product and stores it as the product image.
///
/// The generator comes from [`CommandContext`](super::CommandContext). The
/// stock binary wires [`NoImageGenerator`](crate::external::NoImageGenerator),
/// so this fails with `IMAGE_GENERATION` unless the host passes its own to
/// [`run_with`](crate::run_with).
///
/// The session lock is released while the generator runs. A failure leaves
/// the current image untouched.
pub async fn generate_product_image(
    state: &SessionState,
    images: &dyn ImageGenerator,
    product_id: i64,
    style: ImagePromptStyle,
) -> Result<ProductView, ApiError> {
    debug!(product_id, style = ?style, "generate_product_image command");

    let prompt = state.with_engine(|e| {
        let product = e
            .product(product_id)
            .ok_or_else(|| ApiError::not_found("Product", product_id))?;
        Ok::<_, ApiError>(image_prompt(&product.name, style)?)
    })?;

    let image = images
        .generate_image(&prompt)
        .await
        .and_then(|uri| check_data_uri(&uri).map(|()| uri))
        .map_err(|e| {
            warn!(product_id, error = %e, "Image generation failed");
            ApiError::from(e)
        })?;

    state.with_engine_mut(|e| {
        e.set_product_image(product_id, image)?;
        let product = e
            .product(product_id)
            .ok_or_else(|| ApiError::not_found("Product", product_id))?;
        Ok(ProductView::new(product, e.settings().currency))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::external::{ImageError, NoImageGenerator};
    use crate::state::Session;
    use async_trait::async_trait;
    use cashier_core::{Currency, Money, Settings};
    use rust_decimal::Decimal;

    struct FixedImage(&'static str);

    #[async_trait]
    impl ImageGenerator for FixedImage {
        async fn generate_image(&self, _prompt: &str) -> Result<String, ImageError> {
            Ok(self.0.to_string())
        }
    }

    fn state() -> SessionState {
        SessionState::new(Session::new(Settings::default(), None))
    }

    fn draft(name: &str, category: &str, price: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_major(price),
            quantity: 5,
            image: None,
        }
    }

    #[test]
    fn test_add_and_filter() {
        let state = state();
        add_product(&state, draft("Green Tea", "Drinks", 8)).unwrap();
        add_product(&state, draft("Croissant", "Bakery", 9)).unwrap();

        let drinks = filter_products(&state, Some("Drinks".to_string()), "tea".to_string());
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].formatted_price, "8.00 ر.س");

        assert_eq!(list_products(&state).len(), 2);
        assert_eq!(list_categories(&state), vec!["Drinks", "Bakery"]);
    }

    #[test]
    fn test_prices_follow_active_currency() {
        let state = state();
        state.with_engine_mut(|e| e.set_currency(Currency::Usd));
        let view = add_product(&state, draft("Tea", "Drinks", 1)).unwrap();

        assert_eq!(view.price.rounded(), Money::new(Decimal::ONE));
        let stored = state.with_engine(|e| e.product(view.id).unwrap().price);
        assert_eq!(stored.rounded().to_string(), "3.70");
    }

    #[test]
    fn test_category_lifecycle() {
        let state = state();
        add_category(&state, "Desserts".to_string()).unwrap();
        add_product(&state, draft("Kunafa", "Desserts", 22)).unwrap();

        let err = delete_category(&state, "Desserts".to_string()).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let renamed = rename_category(&state, "Desserts".to_string(), "Sweets".to_string());
        assert_eq!(renamed.retagged, 1);
        assert_eq!(renamed.categories, vec!["Sweets"]);
    }

    #[test]
    fn test_missing_product() {
        let err = get_product(&state(), 42).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_generated_image_is_stored() {
        let state = state();
        let tea = add_product(&state, draft("Tea", "Drinks", 8)).unwrap();

        let uri = "data:image/png;base64,iVBORw0KGgo=";
        let view = generate_product_image(&state, &FixedImage(uri), tea.id, ImagePromptStyle::Photo)
            .await
            .unwrap();
        assert_eq!(view.image, uri);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_image() {
        let state = state();
        let tea = add_product(&state, draft("Tea", "Drinks", 8)).unwrap();

        let err = generate_product_image(&state, &NoImageGenerator, tea.id, ImagePromptStyle::Text)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageGeneration);

        let err = generate_product_image(&state, &FixedImage("nope"), tea.id, ImagePromptStyle::Text)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageGeneration);
        assert_eq!(get_product(&state, tea.id).unwrap().image, tea.image);
    }
}
