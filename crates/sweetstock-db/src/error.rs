//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        CoreError (plan / validation)       │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  DbError (this module) ← classifies UNIQUE, BUSY, pool timeouts        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in HTTP app) ← status code + {detail, code}                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sweetstock_core::{CoreError, ValidationError};
use thiserror::Error;

/// SQLite primary result codes that mean "another writer is in the way".
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

const UNIQUE_FAILED: &str = "UNIQUE constraint failed: ";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Second batch with the same code for one product
    /// - Reused invoice number
    /// - Supplier or retailer name already registered
    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Ledger rule or input validation failure.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A concurrent writer won and retrying is safe.
    ///
    /// ## When This Occurs
    /// - Per-product lock not acquired within `lock_timeout`
    /// - SQLite stayed busy for every write attempt
    /// - Guarded batch decrement matched no row
    #[error("Conflict on {resource}: {reason}")]
    Conflict { resource: String, reason: String },

    /// SQLite reported BUSY / LOCKED. Retried internally, surfaced as
    /// `Conflict` once attempts run out.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored value could not be turned back into a domain value.
    #[error("Corrupt {column} value: {value}")]
    Decode { column: String, value: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        DbError::Duplicate {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::Conflict {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn decode(column: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::Decode {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether the write should be attempted again.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_))
    }

    /// Whether this is a UNIQUE violation on `table` (any column).
    pub fn is_duplicate_in(&self, table: &str) -> bool {
        matches!(self, DbError::Duplicate { entity, .. } if entity == table)
    }

    /// Replaces the generic UNIQUE classification with a caller-provided one.
    ///
    /// `From<sqlx::Error>` only knows the table and column from the SQLite
    /// message; repositories know the offending value.
    pub fn or_duplicate(
        self,
        entity: &str,
        field: &str,
        value: impl Into<String>,
    ) -> Self {
        match self {
            DbError::Duplicate { .. } => DbError::duplicate(entity, field, value),
            other => other,
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → UNIQUE → Duplicate { table, column }
///                               BUSY / LOCKED → Busy
///                               other → QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // Composite primary keys report the same message.
                if db_err.is_unique_violation() || msg.starts_with(UNIQUE_FAILED) {
                    // "UNIQUE constraint failed: sales.invoice_number"
                    let target = msg.split(UNIQUE_FAILED).nth(1).unwrap_or("unknown");
                    let (table, column) = target.split_once('.').unwrap_or((target, "unknown"));
                    return DbError::Duplicate {
                        entity: table.to_string(),
                        field: column.to_string(),
                        value: String::new(),
                    };
                }

                let primary_code = db_err
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);

                match primary_code {
                    Some(SQLITE_BUSY) | Some(SQLITE_LOCKED) => DbError::Busy(msg),
                    _ => DbError::QueryFailed(msg),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { index, source } => DbError::decode(index, source.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_duplicate_rewrites_only_duplicates() {
        let generic = DbError::duplicate("suppliers", "name", "");
        let named = generic.or_duplicate("Supplier", "name", "Bikaner Sweets");
        assert_eq!(
            named.to_string(),
            "Supplier with name 'Bikaner Sweets' already exists"
        );

        let other = DbError::not_found("Product", 3).or_duplicate("Supplier", "name", "x");
        assert!(matches!(other, DbError::NotFound { .. }));
    }

    #[test]
    fn test_domain_errors_pass_through_display() {
        let err: DbError = CoreError::InsufficientStock {
            product_id: 1,
            requested: 5,
            available: 2,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: requested 5, available 2"
        );
    }
}
