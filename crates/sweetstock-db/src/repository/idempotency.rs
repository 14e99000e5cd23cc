//! # Idempotency Keys
//!
//! Replay protection for `POST /api/purchases/` and `POST /api/sales/`.
//!
//! The dashboard's HTTP client retries POSTs on 5xx and network errors. A
//! client that sends an `Idempotency-Key` header gets exactly one write per
//! key; repeats return the resource created by the first request.
//!
//! ```text
//! POST (key K) ─► tx: lookup(scope, K) ── none ──► write ─► remember(K, id) ─► commit ─► 201
//! POST (key K) ─► tx: lookup(scope, K) ── id ────► rollback ─► load(id) ───────────────► 200
//! ```
//!
//! The key row is written in the same transaction as the resource, so a
//! rolled-back write leaves no key behind.

use chrono::Utc;
use sqlx::SqliteConnection;

use crate::error::DbResult;

/// Which kind of write a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Purchase,
    Sale,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Purchase => "purchase",
            Scope::Sale => "sale",
        }
    }
}

/// Table name used when classifying UNIQUE violations on the key row.
pub(crate) const TABLE: &str = "idempotency_keys";

/// Returns the resource id stored under `key`, if any.
pub(crate) async fn lookup(
    conn: &mut SqliteConnection,
    scope: Scope,
    key: &str,
) -> DbResult<Option<i64>> {
    let id = sqlx::query_scalar("SELECT resource_id FROM idempotency_keys WHERE scope = ?1 AND key = ?2")
        .bind(scope.as_str())
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(id)
}

/// Stores `key → resource_id`. Fails with `Duplicate` if a concurrent
/// request claimed the key first.
pub(crate) async fn remember(
    conn: &mut SqliteConnection,
    scope: Scope,
    key: &str,
    resource_id: i64,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO idempotency_keys (scope, key, resource_id, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(scope.as_str())
    .bind(key)
    .bind(resource_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(())
}
