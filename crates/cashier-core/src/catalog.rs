//! # Catalog
//!
//! Product listings in the display currency, category management, and the
//! prompts used to ask an image generator for product pictures.
//!
//! ## Translate-Before-Write
//! ```text
//! ProductDraft.price (active currency)
//!        │
//!        ▼  to_canonical
//! Product.price (SAR) ──► stored
//!        │
//!        ▼  to_display (on every read)
//! ProductView.price (active currency)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::currency::{format_amount, to_canonical, to_display, Currency};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::{Product, ProductDraft};
use crate::PLACEHOLDER_IMAGE;

// =============================================================================
// Product Views
// =============================================================================

/// A product as the catalog screen shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// Price in the display currency, unrounded.
    pub price: Money,
    /// e.g. `"2.70 $"`
    pub formatted_price: String,
    pub quantity: i64,
    pub in_stock: bool,
    pub image: String,
}

impl ProductView {
    pub fn new(product: &Product, currency: Currency) -> Self {
        let price = to_display(product.price, currency);
        ProductView {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price,
            formatted_price: format_amount(price, currency),
            quantity: product.quantity,
            in_stock: product.quantity > 0,
            image: product.image.clone(),
        }
    }
}

/// Products matching an optional exact category and a case-insensitive
/// name substring. An empty search matches everything.
pub fn filter_catalog<'a>(
    products: &'a [Product],
    category: Option<&str>,
    search: &str,
) -> Vec<&'a Product> {
    let needle = search.trim().to_lowercase();
    products
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

// =============================================================================
// Drafts
// =============================================================================

/// Builds a new product from a draft entered under `currency`.
///
/// The conversion to canonical is one-way: for a non-base currency the
/// stored price is the exact quotient, which may not display back to the
/// very same digits.
pub fn new_product(id: i64, draft: &ProductDraft, currency: Currency) -> Product {
    let name = draft.name.trim().to_string();
    Product {
        id,
        image_hint: Some(name.to_lowercase()),
        name,
        category: draft.category.trim().to_string(),
        price: to_canonical(draft.price, currency),
        quantity: draft.quantity,
        image: image_or_placeholder(draft.image.as_deref()),
    }
}

/// Applies an edit form to an existing product.
///
/// If the entered price equals what the form was showing (the current
/// canonical price in `currency`, rounded for display), the canonical price
/// is kept exactly. Otherwise the entered price is converted.
pub fn apply_edit(product: &mut Product, draft: &ProductDraft, currency: Currency) {
    let shown = to_display(product.price, currency).rounded();
    if draft.price.rounded() != shown {
        product.price = to_canonical(draft.price, currency);
    }

    product.name = draft.name.trim().to_string();
    product.image_hint = Some(product.name.to_lowercase());
    product.category = draft.category.trim().to_string();
    product.quantity = draft.quantity;
    if let Some(image) = draft.image.as_deref().filter(|i| !i.trim().is_empty()) {
        product.image = image.to_string();
    }
}

fn image_or_placeholder(image: Option<&str>) -> String {
    image
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string()
}

// =============================================================================
// Categories
// =============================================================================

/// Managed categories merged with every tag in use, in first-seen order.
pub fn categories(managed: &[String], products: &[Product]) -> Vec<String> {
    let mut all: Vec<String> = Vec::new();
    let tags = managed.iter().map(String::as_str).chain(products.iter().map(|p| p.category.as_str()));
    for tag in tags {
        if !tag.is_empty() && !all.iter().any(|c| c == tag) {
            all.push(tag.to_string());
        }
    }
    all
}

/// Adds a managed category. Fails with `DuplicateKey` if the name is
/// already known (managed or in use).
pub fn add_category(managed: &mut Vec<String>, products: &[Product], name: &str) -> CoreResult<()> {
    let name = name.trim();
    crate::validation::validate_category_name(name)?;

    if categories(managed, products).iter().any(|c| c == name) {
        return Err(CoreError::DuplicateKey {
            entity: "Category".to_string(),
            key: name.to_string(),
        });
    }
    managed.push(name.to_string());
    Ok(())
}

/// Renames a category everywhere, retagging products.
///
/// Renaming to an empty name or to itself does nothing. Returns the number
/// of products retagged.
pub fn rename_category(
    managed: &mut Vec<String>,
    inventory: &mut Inventory,
    old: &str,
    new: &str,
) -> usize {
    let new = new.trim();
    if new.is_empty() || new == old {
        return 0;
    }

    let new_known = managed.iter().any(|c| c == new);
    if new_known {
        managed.retain(|c| c != old);
    } else if let Some(slot) = managed.iter_mut().find(|c| c.as_str() == old) {
        *slot = new.to_string();
    }

    inventory.retag(old, new)
}

/// Removes a managed category. Fails with `CategoryInUse` while any product
/// carries the tag.
pub fn delete_category(managed: &mut Vec<String>, products: &[Product], name: &str) -> CoreResult<()> {
    let product_count = products.iter().filter(|p| p.category == name).count();
    if product_count > 0 {
        return Err(CoreError::CategoryInUse {
            category: name.to_string(),
            product_count,
        });
    }
    managed.retain(|c| c != name);
    Ok(())
}

// =============================================================================
// Image Prompts
// =============================================================================

/// What kind of picture to request for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ImagePromptStyle {
    /// A studio-style product photograph.
    Photo,
    /// The product name set in a decorative Arabic typeface.
    Text,
}

/// Builds the prompt sent to the image generator.
pub fn image_prompt(product_name: &str, style: ImagePromptStyle) -> CoreResult<String> {
    let name = product_name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        }
        .into());
    }

    Ok(match style {
        ImagePromptStyle::Photo => format!(
            "a professional, clean product photo of {name}, on a white background, high quality, commercial"
        ),
        ImagePromptStyle::Text => format!(
            "a simple, elegant graphic with a white background showing the text \"{name}\" in a stylish Arabic font. Minimalist, clean design."
        ),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::tests::product;

    fn tagged(id: i64, name: &str, category: &str) -> Product {
        Product {
            name: name.to_string(),
            category: category.to_string(),
            ..product(id, 5, 3)
        }
    }

    fn draft(price: Money) -> ProductDraft {
        ProductDraft {
            name: " Green Tea ".to_string(),
            category: "Drinks".to_string(),
            price,
            quantity: 12,
            image: None,
        }
    }

    #[test]
    fn test_filter_catalog() {
        let products = vec![
            tagged(1, "Latte", "Drinks"),
            tagged(2, "Iced Latte", "Cold"),
            tagged(3, "Cake", "Sweets"),
        ];

        assert_eq!(filter_catalog(&products, None, "").len(), 3);
        assert_eq!(filter_catalog(&products, None, "LATTE").len(), 2);
        let hits = filter_catalog(&products, Some("Cold"), "latte");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_new_product_defaults() {
        let p = new_product(7, &draft(Money::from_major(4)), Currency::Sar);
        assert_eq!(p.name, "Green Tea");
        assert_eq!(p.image, PLACEHOLDER_IMAGE);
        assert_eq!(p.image_hint.as_deref(), Some("green tea"));
        assert_eq!(p.price, Money::from_major(4));
    }

    #[test]
    fn test_new_product_converts_to_canonical() {
        let p = new_product(1, &draft(Money::from_minor(270)), Currency::Usd);
        assert_eq!(p.price, Money::from_major(10));
    }

    #[test]
    fn test_edit_keeps_canonical_when_price_untouched() {
        let mut p = tagged(1, "Tea", "Drinks");
        p.price = Money::from_minor(333);
        let shown = to_display(p.price, Currency::Usd).rounded();

        apply_edit(&mut p, &draft(shown), Currency::Usd);
        assert_eq!(p.price, Money::from_minor(333));
        assert_eq!(p.quantity, 12);

        apply_edit(&mut p, &draft(Money::from_minor(270)), Currency::Usd);
        assert_eq!(p.price, Money::from_major(10));
    }

    #[test]
    fn test_categories_union_in_first_seen_order() {
        let managed = vec!["Drinks".to_string(), "Empty".to_string()];
        let products = vec![tagged(1, "Cake", "Sweets"), tagged(2, "Tea", "Drinks")];

        assert_eq!(categories(&managed, &products), vec!["Drinks", "Empty", "Sweets"]);
    }

    #[test]
    fn test_add_category_rejects_known_name() {
        let mut managed = vec![];
        let products = vec![tagged(1, "Cake", "Sweets")];

        add_category(&mut managed, &products, "Snacks").unwrap();
        assert!(matches!(
            add_category(&mut managed, &products, "Sweets"),
            Err(CoreError::DuplicateKey { .. })
        ));
        assert!(add_category(&mut managed, &products, " ").is_err());
    }

    #[test]
    fn test_rename_category_retags_products() {
        let mut managed = vec!["Drinks".to_string()];
        let mut inventory = Inventory::new(vec![
            tagged(1, "Tea", "Drinks"),
            tagged(2, "Cake", "Sweets"),
        ]);

        assert_eq!(rename_category(&mut managed, &mut inventory, "Drinks", "Beverages"), 1);
        assert_eq!(managed, vec!["Beverages"]);
        assert_eq!(inventory.get(1).unwrap().category, "Beverages");

        assert_eq!(rename_category(&mut managed, &mut inventory, "Sweets", "  "), 0);
        assert_eq!(inventory.get(2).unwrap().category, "Sweets");
    }

    #[test]
    fn test_delete_category_in_use() {
        let mut managed = vec!["Drinks".to_string(), "Old".to_string()];
        let products = vec![tagged(1, "Tea", "Drinks")];

        assert_eq!(
            delete_category(&mut managed, &products, "Drinks"),
            Err(CoreError::CategoryInUse {
                category: "Drinks".to_string(),
                product_count: 1
            })
        );
        delete_category(&mut managed, &products, "Old").unwrap();
        assert_eq!(managed, vec!["Drinks"]);
    }

    #[test]
    fn test_image_prompts() {
        let photo = image_prompt("Falafel", ImagePromptStyle::Photo).unwrap();
        assert!(photo.contains("product photo of Falafel"));

        let text = image_prompt("Falafel", ImagePromptStyle::Text).unwrap();
        assert!(text.contains("\"Falafel\""));
        assert!(text.contains("Arabic font"));

        assert!(image_prompt("  ", ImagePromptStyle::Photo).is_err());
    }

    #[test]
    fn test_product_view_uses_display_currency() {
        let p = tagged(1, "Tea", "Drinks");
        let view = ProductView::new(&p, Currency::Usd);
        assert_eq!(view.price, Money::from_minor(135));
        assert_eq!(view.formatted_price, "1.35 $");
        assert!(view.in_stock);
    }
}
