//! # sweetstock-db: Database Layer for SweetStock
//!
//! SQLite persistence for the inventory ledger, using sqlx for async
//! access and per-product locks for the sale write path.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetStock Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales/)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   sweetstock-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BatchRepo     │    │ 001_initial  │  │   │
//! │  │   │ ProductLocks  │    │ SaleRepo      │    │   _schema    │  │   │
//! │  │   │ WritePolicy   │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  │                        ./sweetstock.db                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`locks`] - Per-product sale serialization
//! - [`retry`] - Bounded retry for SQLITE_BUSY
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweetstock_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./sweetstock.db")).await?;
//!
//! let stock = db.batches().overview().await?;
//! let sale = db.sales().record(new_sale, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod locks;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod retry;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use retry::WritePolicy;

// Repository re-exports for convenience
pub use repository::batch::BatchRepository;
pub use repository::partner::{RetailerRepository, SupplierRepository};
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
pub use repository::Recorded;
