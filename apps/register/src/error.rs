//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cashier POS                            │
//! │                                                                         │
//! │  UI                          Register                                   │
//! │  ──                          ────────                                   │
//! │                                                                         │
//! │  add_to_cart { productId }                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Business rule? ── CoreError::OutOfStock ─────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Storage?  ─────── DbError (logged) ──────────► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "OUT_OF_STOCK", "message": "Product 3 (Latte) is out..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::CoreError;
use cashier_db::DbError;
use serde::Serialize;

use crate::external::ImageError;

/// API error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NO_ACTIVE_ORDER",
///   "message": "No active order: select a table or start a takeaway order"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    DatabaseError,

    /// Business rule violation
    BusinessLogic,

    /// Cart mutation without a selected table or takeaway order
    NoActiveOrder,

    OutOfStock,

    InsufficientStock,

    EmptyCart,

    /// Entity with the same key already exists
    Duplicate,

    /// Image generation failed (non-critical)
    ImageGeneration,

    /// Unknown command name or malformed arguments
    BadRequest,

    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
///
/// Details are logged; the UI only sees a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Storage operation failed");
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Storage is unavailable")
            }
            DbError::WriterClosed => {
                ApiError::new(ErrorCode::DatabaseError, "Storage is shutting down")
            }
            _ => ApiError::new(ErrorCode::DatabaseError, "Storage operation failed"),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::NoActiveOrder => ErrorCode::NoActiveOrder,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::DuplicateKey { .. } => ErrorCode::Duplicate,
            CoreError::ProductNotFound(_)
            | CoreError::TableNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::ItemNotInCart(_) => ErrorCode::NotFound,
            CoreError::CategoryInUse { .. }
            | CoreError::TableOccupied { .. }
            | CoreError::ProductInOpenOrder { .. } => ErrorCode::BusinessLogic,
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
        };
        ApiError::new(code, message)
    }
}

/// Image failures never touch stored data, so every variant maps to the
/// same non-critical code.
impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::new(ErrorCode::ImageGeneration, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid arguments: {err}"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::ValidationError;

    #[test]
    fn test_core_errors_keep_their_message() {
        let err = ApiError::from(CoreError::TableOccupied { table_id: 2 });
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Table 2 is occupied and cannot be deleted");
    }

    #[test]
    fn test_validation_is_unwrapped() {
        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "phone".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "phone is required");
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err = ApiError::from(DbError::QueryFailed("disk I/O error".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("disk"));
    }

    #[test]
    fn test_image_errors() {
        let err = ApiError::from(ImageError::Unavailable);
        assert_eq!(err.code, ErrorCode::ImageGeneration);
        assert_eq!(err.message, "Image generation is not configured");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::from(CoreError::EmptyCart)).unwrap();
        assert_eq!(json["code"], "EMPTY_CART");
        assert_eq!(json["message"], "Cannot pay for an empty cart");
    }
}
