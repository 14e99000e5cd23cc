//! # Error Types
//!
//! Domain-specific error types for sweetstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweetstock-core errors (this file)                                    │
//! │  ├── CoreError        - Ledger rule violations, amount overflow        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  sweetstock-db errors (separate crate)                                 │
//! │  └── DbError          - NotFound, Duplicate, Conflict, storage faults  │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What the dashboard sees ({detail, code})       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Dashboard    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core ledger errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product's live batches cannot cover the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/sales/ (qty: 12)
    ///      │
    ///      ▼
    /// FIFO candidates: B2 (5) + B1 (4) = 9 available
    ///      │
    ///      ▼
    /// InsufficientStock { product_id, requested: 12, available: 9 }
    ///      │
    ///      ▼
    /// No batch touched, 409 with "only 9 available"
    /// ```
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i64,
        requested: i64,
        available: i64,
    },

    /// A derived amount or count left the i64 range.
    ///
    /// Input bounds keep any single line total in range; this surfaces when
    /// many of them are summed.
    #[error("{what} exceeds the supported range")]
    Overflow { what: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn overflow(what: impl Into<String>) -> Self {
        CoreError::Overflow { what: what.into() }
    }

    /// Units missing to satisfy the request, zero for non-stock errors.
    pub fn shortfall(&self) -> i64 {
        match self {
            CoreError::InsufficientStock {
                requested,
                available,
                ..
            } => requested - available,
            CoreError::Overflow { .. } | CoreError::Validation(_) => 0,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field-level and user-correctable. Surfaced as 422 by the API.
#[derive(Debug, Error, PartialEq, Eq)]
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

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. unparseable decimal, bad header value).
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
