//! # Error Types
//!
//! Domain-specific error types for cashier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashier-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cashier-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  register app errors                                                   │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable by the operator retrying. A rejected
//! operation leaves the engine exactly as it was.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A cart mutation was attempted with no table or takeaway selected.
    ///
    /// The UI answers this by prompting the operator to pick an order.
    #[error("No active order: select a table or start a takeaway order")]
    NoActiveOrder,

    /// The product has no stock left to put in a cart.
    #[error("Product {product_id} ({name}) is out of stock")]
    OutOfStock { product_id: i64, name: String },

    /// Allocation would take the stock of a product below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line: Latte x2, stock: 1
    ///      │
    ///      ▼
    /// change_quantity(+3)
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 1, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Only 1 left"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Payment attempted on a cart with no lines.
    #[error("Cannot pay for an empty cart")]
    EmptyCart,

    /// Category deletion blocked while products still carry the tag.
    #[error("Category '{category}' is used by {product_count} product(s)")]
    CategoryInUse {
        category: String,
        product_count: usize,
    },

    /// An entity with the same key already exists in its collection.
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: String, key: String },

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// The active cart has no line for the product.
    #[error("Product {0} is not in the active cart")]
    ItemNotInCart(i64),

    /// Tables with an open order cannot be deleted.
    #[error("Table {table_id} is occupied and cannot be deleted")]
    TableOccupied { table_id: i64 },

    /// Deleting a product while units of it sit in an open cart would lose
    /// those units from the books.
    #[error("Product {product_id} is in an open order and cannot be deleted")]
    ProductInOpenOrder { product_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. unknown currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 1,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7: available 1, requested 3"
        );

        let err = CoreError::CategoryInUse {
            category: "Drinks".to_string(),
            product_count: 2,
        };
        assert_eq!(err.to_string(), "Category 'Drinks' is used by 2 product(s)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "phone is required");

        let err = ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "tax_rate must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
