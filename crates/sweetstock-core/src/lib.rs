//! # sweetstock-core: Pure Ledger Logic for SweetStock
//!
//! This crate holds the rules of the inventory ledger as pure functions with
//! zero I/O dependencies. The database crate feeds it rows; it hands back
//! plans and reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetStock Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (browser)                          │   │
//! │  │    Products ──► Purchases ──► Sales ──► Stock ──► Reports      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sweetstock-api (axum)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sweetstock-db (SQLite)                       │   │
//! │  │        repositories, per-product locks, transactions            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ sweetstock-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │  fifo   │ │analytics │ │validate │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Batch, Sale, Allocation, reports)
//! - [`money`] - Money type with integer paise arithmetic
//! - [`fifo`] - FIFO ordering and all-or-nothing allocation planning
//! - [`analytics`] - Expiry, top/slow mover and monthly profit reductions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use sweetstock_core::fifo::{plan_allocation, FifoCandidate};
//! use sweetstock_core::Money;
//! use chrono::{NaiveDate, TimeZone, Utc};
//!
//! let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
//! let batches = vec![
//!     FifoCandidate {
//!         batch_id: 1,
//!         expiry_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!         purchased_at: at,
//!         quantity_remaining: 5,
//!         unit_cost: Money::from_paise(1000),
//!     },
//!     FifoCandidate {
//!         batch_id: 2,
//!         expiry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
//!         purchased_at: at,
//!         quantity_remaining: 5,
//!         unit_cost: Money::from_paise(900),
//!     },
//! ];
//!
//! let plan = plan_allocation(7, 7, batches).unwrap();
//! assert_eq!(plan[0].batch_id, 2); // earlier expiry drains first
//! assert_eq!(plan[0].quantity, 5);
//! assert_eq!(plan[1].quantity, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod fifo;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{MAX_QUANTITY, MAX_UNIT_AMOUNT};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days ahead of today that the expiry alert window covers by default.
pub const DEFAULT_EXPIRY_ALERT_DAYS: u32 = 7;

/// Look-back window for the slow-moving report.
pub const SLOW_MOVING_WINDOW_DAYS: i64 = 30;

/// Report limit used when the caller gives none.
pub const DEFAULT_REPORT_LIMIT: u32 = 5;

/// Largest report limit a caller may ask for.
pub const MAX_REPORT_LIMIT: u32 = 50;

/// Currency code reported by the profit report when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";
