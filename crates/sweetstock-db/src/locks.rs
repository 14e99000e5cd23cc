//! # Per-Product Locks
//!
//! Serializes the allocate-and-persist section of a sale per product.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale(P1, 4) ──► lock P1 ──► read batches ─► plan ─► write ─► unlock    │
//! │  sale(P1, 3) ──► lock P1 ···· waits (bounded by lock_timeout) ···►      │
//! │  sale(P2, 9) ──► lock P2 ──► runs in parallel with P1                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A waiter that does not get the lock within the timeout receives
//! `DbError::Conflict`, which the API reports as retryable.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

/// Held for as long as a product's batches are being allocated.
pub type ProductGuard = OwnedMutexGuard<()>;

/// Registry of one async mutex per product id.
#[derive(Debug, Clone, Default)]
pub struct ProductLocks {
    inner: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits up to `timeout` for exclusive access to `product_id`.
    pub async fn acquire(&self, product_id: i64, timeout: Duration) -> DbResult<ProductGuard> {
        // Clone the Arc out so the DashMap shard is not held across the await.
        let lock = self.inner.entry(product_id).or_default().value().clone();

        match tokio::time::timeout(timeout, lock.lock_owned()).await {
            Ok(guard) => {
                debug!(product_id, "Product lock acquired");
                Ok(guard)
            }
            Err(_) => {
                warn!(product_id, timeout_ms = timeout.as_millis() as u64, "Product lock timed out");
                Err(DbError::conflict(
                    format!("product {}", product_id),
                    "another sale for this product is still in progress",
                ))
            }
        }
    }

    /// Number of products that have been locked at least once.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_product_times_out_while_held() {
        let locks = ProductLocks::new();
        let _held = locks.acquire(1, Duration::from_millis(50)).await.unwrap();

        let err = locks.acquire(1, Duration::from_millis(20)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_different_products_do_not_block() {
        let locks = ProductLocks::new();
        let _p1 = locks.acquire(1, Duration::from_millis(50)).await.unwrap();
        let _p2 = locks.acquire(2, Duration::from_millis(50)).await.unwrap();
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_lock_is_reusable_after_release() {
        let locks = ProductLocks::new();
        {
            let _g = locks.acquire(7, Duration::from_millis(50)).await.unwrap();
        }
        assert!(locks.acquire(7, Duration::from_millis(50)).await.is_ok());
    }
}
