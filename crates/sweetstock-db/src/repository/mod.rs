//! # Repositories
//!
//! One repository per ledger component. Each holds a pool handle and is
//! created on demand from [`Database`](crate::Database).
//!
//! ```text
//! products   ── Catalog
//! partner    ── Supplier / Retailer registry
//! batch      ── Batch ledger (purchases, remaining stock, expiry)
//! allocator  ── FIFO draw inside a sale transaction
//! sale       ── Sale recorder (lock → tx → allocate → persist)
//! report     ── Analytics projections
//! idempotency── Replay protection for POSTed writes
//! ```

pub mod allocator;
pub mod batch;
pub mod idempotency;
pub mod partner;
pub mod product;
pub mod report;
pub mod sale;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a stored pack size back into a Decimal.
pub(crate) fn parse_unit_size(raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw).map_err(|_| DbError::decode("unit_size_value", raw))
}

/// A write that may have been a replay of an earlier request.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded<T> {
    /// The write happened now.
    Created(T),
    /// An earlier write with the same idempotency key is returned instead.
    Replayed(T),
}

impl<T> Recorded<T> {
    pub fn is_replay(&self) -> bool {
        matches!(self, Recorded::Replayed(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Recorded::Created(v) | Recorded::Replayed(v) => v,
        }
    }
}
