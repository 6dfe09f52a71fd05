//! # Validation Module
//!
//! Input validation for operator-entered data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  ├── Required fields, basic formats                                    │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands (Rust)                                     │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules, run before any engine mutation          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine invariants                                            │
//! │  ├── Stock never negative                                              │
//! │  └── Discount bounded by subtotal                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::validation::{validate_phone, validate_stock_quantity};
//!
//! validate_phone("0501234567").unwrap();
//! validate_stock_quantity(5).unwrap();
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::Discount;
use crate::types::{CustomerDraft, ProductDraft, TableDraft};
use crate::{
    MAX_DISCOUNT_AMOUNT, MAX_NAME_LENGTH, MAX_PRICE, MAX_STOCK_QUANTITY, MAX_TABLE_SEATS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks a required, length-limited text field.
fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use cashier_core::validation::validate_product_name;
///
/// assert!(validate_product_name("قهوة عربية").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_NAME_LENGTH)
}

pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    required_text("category", name, MAX_NAME_LENGTH)
}

pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    required_text("table name", name, MAX_NAME_LENGTH)
}

pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required_text("customer name", name, MAX_NAME_LENGTH)
}

/// Validates a phone number.
///
/// ## Rules
/// - Required
/// - Digits plus `+`, spaces, hyphens and parentheses
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    required_text("phone", phone, 32)?;

    let phone = phone.trim();
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
        || !phone.chars().any(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+', '-' and parentheses".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional email address. Blank counts as absent.
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(());
    };

    let valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock quantity. Zero is allowed (sold out).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - Must not exceed `MAX_PRICE` whole units
///
/// ## Example
/// ```rust
/// use cashier_core::money::Money;
/// use cashier_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_minor(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_minor(-100)).is_err());
/// assert!(validate_price(Money::from_major(2_000_000)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > Money::from_major(MAX_PRICE) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

pub fn validate_seats(seats: u32) -> ValidationResult<()> {
    if seats == 0 || seats > MAX_TABLE_SEATS {
        return Err(ValidationError::OutOfRange {
            field: "seats".to_string(),
            min: 1,
            max: i64::from(MAX_TABLE_SEATS),
        });
    }

    Ok(())
}

/// Rejects negative discount input and fixed amounts above
/// `MAX_DISCOUNT_AMOUNT`. Values above the subtotal are allowed here; the
/// pricing pipeline caps them.
pub fn validate_discount(discount: &Discount) -> ValidationResult<()> {
    let negative = match discount {
        Discount::None => false,
        Discount::Amount(value) => value.is_negative(),
        Discount::Percentage(pct) => *pct < Decimal::ZERO,
    };

    if negative {
        return Err(ValidationError::InvalidFormat {
            field: "discount".to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    if let Discount::Amount(value) = discount {
        if *value > Money::from_major(MAX_DISCOUNT_AMOUNT) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: MAX_DISCOUNT_AMOUNT,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

/// All product form fields are required.
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_category_name(&draft.category)?;
    validate_price(draft.price)?;
    validate_stock_quantity(draft.quantity)
}

pub fn validate_customer_draft(draft: &CustomerDraft) -> ValidationResult<()> {
    validate_customer_name(&draft.name)?;
    validate_phone(&draft.phone)?;
    validate_email(draft.email.as_deref())
}

pub fn validate_table_draft(draft: &TableDraft) -> ValidationResult<()> {
    validate_table_name(&draft.name)?;
    validate_seats(draft.seats)
}

// =============================================================================
// Unit Tests
// =============================================================================
