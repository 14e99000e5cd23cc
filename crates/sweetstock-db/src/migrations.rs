//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied in sequence order when a [`Database`](crate::Database) opens.
//!
//! ```text
//!   open ──► _sqlx_migrations present? ──no──► create it
//!                      │
//!                      ▼
//!            embedded  001_initial_schema  ... NNN_*
//!            applied   001                         ◄── diff by version
//!                      │
//!                      ▼
//!            apply the missing ones, one transaction each
//! ```
//!
//! Applied files are checksummed. Change the schema by adding
//! `NNN_description.sql` with the next number; editing an applied file makes
//! every existing ledger refuse to open.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Ledger schema migrated");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATOR.migrations.len(), applied as usize))
}
