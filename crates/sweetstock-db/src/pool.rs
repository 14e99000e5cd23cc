//! # Database Handle
//!
//! Opens the SQLite file, applies the schema, and hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Database (Clone)                               │
//! │                                                                         │
//! │   DbConfig::new(path)                                                   │
//! │     .max_connections(n) .lock_timeout(d) .write_attempts(k)             │
//! │            │                                                            │
//! │            ▼                                                            │
//! │   Database::new(config) ── WAL, foreign keys, busy_timeout ── migrate   │
//! │            │                                                            │
//! │     ┌──────┴───────────────────────────────┐                            │
//! │     ▼                                      ▼                            │
//! │  ┌────────────────────────────┐   ┌────────────────────┐                │
//! │  │ SqlitePool                 │   │ ProductLocks       │                │
//! │  │ readers share connections  │   │ P1 ▣  P2 ▢  P3 ▢   │                │
//! │  └────────────────────────────┘   └────────────────────┘                │
//! │     products() suppliers() retailers() batches() sales() reports()      │
//! │                                                                         │
//! │  A sale queues on its product's lock before it takes a connection.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets the report queries read while a sale is writing.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::locks::ProductLocks;
use crate::migrations;
use crate::repository::batch::BatchRepository;
use crate::repository::partner::{RetailerRepository, SupplierRepository};
use crate::repository::product::ProductRepository;
use crate::repository::report::ReportRepository;
use crate::repository::sale::SaleRepository;
use crate::retry::WritePolicy;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// How to open the ledger database.
///
/// ```rust,ignore
/// let config = DbConfig::new("./sweetstock.db")
///     .max_connections(8)
///     .lock_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub path: PathBuf,

    pub max_connections: u32,

    /// Longest wait for a free pooled connection.
    pub acquire_timeout: Duration,

    /// SQLite's own wait on a locked file before it reports BUSY.
    pub busy_timeout: Duration,

    /// Per-product lock wait and BUSY retry budget for writes.
    pub write_policy: WritePolicy,

    /// Apply pending migrations while connecting.
    pub migrate: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            path: PathBuf::from("sweetstock.db"),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(2),
            write_policy: WritePolicy::default(),
            migrate: true,
        }
    }
}

impl DbConfig {
    /// File-backed ledger at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Private in-memory ledger. Each call opens a separate database.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(IN_MEMORY),
            // every pooled connection would otherwise see its own empty db
            max_connections: 1,
            ..Default::default()
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// How long a sale waits for its product's lock.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.write_policy.lock_timeout = timeout;
        self
    }

    /// Attempts for a write transaction that keeps hitting SQLITE_BUSY.
    pub fn write_attempts(mut self, attempts: u32) -> Self {
        self.write_policy.write_attempts = attempts.max(1);
        self
    }

    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = format!("sqlite://{}?mode=rwc", self.path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite; partner deletes rely on SET NULL
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
            .create_if_missing(true);
        Ok(options)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(1)
            .acquire_timeout(self.acquire_timeout);

        // The in-memory ledger lives exactly as long as its one connection.
        if self.is_in_memory() {
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options.idle_timeout(Some(Duration::from_secs(600)))
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the ledger.
///
/// Clones share the pool and the product lock registry, so every clone
/// serializes sales against the same locks.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./sweetstock.db")).await?;
/// let laddu = db.products().create(NewProduct { name: "Laddu".into(), ..Default::default() }).await?;
/// let sale = db.sales().record(new_sale, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    locks: ProductLocks,
    policy: WritePolicy,
}

impl Database {
    /// Opens (or creates) the database and brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening ledger database");

        let connect_options = config.connect_options()?;
        debug!(busy_timeout_ms = config.busy_timeout.as_millis() as u64, "SQLite options ready");

        let pool = config
            .pool_options()
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            lock_timeout_ms = config.write_policy.lock_timeout.as_millis() as u64,
            write_attempts = config.write_policy.write_attempts,
            "Ledger pool ready"
        );

        let db = Database {
            pool,
            locks: ProductLocks::new(),
            policy: config.write_policy,
        };

        if config.migrate {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.policy
    }

    /// One `SELECT 1` round-trip.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing ledger database");
        self.pool.close().await;
    }
}

// -----------------------------------------------------------------------------
// Repositories
// -----------------------------------------------------------------------------

impl Database {
    /// Catalog.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    pub fn retailers(&self) -> RetailerRepository {
        RetailerRepository::new(self.pool.clone())
    }

    /// Batch ledger (purchases, stock views).
    pub fn batches(&self) -> BatchRepository {
        BatchRepository::new(self.pool.clone(), self.policy)
    }

    /// Sale recorder, bound to this handle's product locks.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone(), self.locks.clone(), self.policy)
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
