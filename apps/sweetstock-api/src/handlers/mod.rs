//! # HTTP Handlers
//!
//! Thin adapters: extract, call one repository method, map the result.
//! No ledger rules live here.
//!
//! ## Module Organization
//! - `products` - Catalog
//! - `partners` - Suppliers and retailers
//! - `purchases` - Batch creation and listing
//! - `sales` - FIFO sale recording
//! - `stock` - Overview and expiry alerts
//! - `reports` - Movers and monthly profit
//! - `health` - Root info and liveness

pub mod health;
pub mod partners;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod stock;

use axum::http::StatusCode;
use sweetstock_db::Recorded;

/// 201 for a fresh write, 200 when an idempotency key replayed it.
pub(crate) fn write_status<T>(recorded: &Recorded<T>) -> StatusCode {
    if recorded.is_replay() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    }
}
