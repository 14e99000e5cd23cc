//! # Write Retry
//!
//! Bounded retry for write transactions that hit SQLite BUSY / LOCKED.
//!
//! ```text
//! attempt 1 ──► Busy ──► sleep 50ms ──► attempt 2 ──► Busy ──► sleep 100ms
//!     ──► attempt 3 ──► Busy ──► DbError::Conflict (caller may retry)
//! ```
//!
//! Each attempt is a fresh transaction, so a failed attempt has already
//! rolled back when the next one starts. The loop itself is
//! `backoff::future::retry_notify` driven by [`LinearBackoff`].

use backoff::backoff::Backoff;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::{DbError, DbResult};

/// Base step of the linear backoff between attempts.
pub const BACKOFF_STEP: Duration = Duration::from_millis(50);

/// Limits applied to every serialized write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    /// Longest wait for a per-product lock.
    pub lock_timeout: Duration,
    /// Total attempts for a write transaction (at least 1).
    pub write_attempts: u32,
}

impl Default for WritePolicy {
    fn default() -> Self {
        WritePolicy {
            lock_timeout: Duration::from_secs(5),
            write_attempts: 3,
        }
    }
}

impl WritePolicy {
    /// Wait schedule for this policy: `step × n` before attempt `n + 1`.
    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff::new(BACKOFF_STEP, self.write_attempts.max(1) - 1)
    }
}

/// Waits that grow by one `step` each time, `max_waits` of them at most.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    step: Duration,
    waits: u32,
    max_waits: u32,
}

impl LinearBackoff {
    pub fn new(step: Duration, max_waits: u32) -> Self {
        LinearBackoff {
            step,
            waits: 0,
            max_waits,
        }
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.waits = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.waits >= self.max_waits {
            return None;
        }
        self.waits += 1;
        Some(self.step * self.waits)
    }
}

/// Runs `op` until it succeeds, fails with a non-busy error, or attempts
/// run out.
///
/// Busy errors are transient and retried on the policy's schedule; every
/// other error is permanent and returned as is. A write still busy on its
/// last attempt becomes `DbError::Conflict`.
pub async fn with_write_retry<T, F, Fut>(policy: WritePolicy, what: &str, mut op: F) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let attempt = || {
        let fut = op();
        async move {
            fut.await.map_err(|err| {
                if err.is_busy() {
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                }
            })
        }
    };

    let notify = |err: DbError, wait: Duration| {
        warn!(what, wait_ms = wait.as_millis() as u64, error = %err, "Database busy, retrying");
    };

    match backoff::future::retry_notify(policy.backoff(), attempt, notify).await {
        Err(err) if err.is_busy() => {
            warn!(what, attempts = policy.write_attempts, error = %err, "Write retries exhausted");
            Err(DbError::conflict(what, "database stayed busy, retry the request"))
        }
        other => other,
    }
}
