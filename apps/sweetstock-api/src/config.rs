//! API server configuration.
//!
//! Loaded in layers, later layers win:
//! 1. Defaults in code
//! 2. `sweetstock.toml` in the working directory (optional)
//! 3. Environment variables, `SWEETSTOCK__SECTION__KEY`
//!    (e.g. `SWEETSTOCK__SERVER__PORT=8080`)

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use sweetstock_core::{DEFAULT_CURRENCY, DEFAULT_EXPIRY_ALERT_DAYS};
use sweetstock_db::DbConfig;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub ledger: LedgerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, created on first start.
    pub path: String,

    pub max_connections: u32,

    /// How long a sale waits for its product's lock.
    pub lock_timeout_ms: u64,

    /// Attempts for a write transaction that hits SQLITE_BUSY.
    pub write_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Window for `GET /api/stock/expiring`, in days.
    pub expiry_alert_days: u32,

    /// Currency code reported by the profit report.
    pub currency: String,
}

impl Settings {
    /// Load configuration from defaults, file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.path", "sweetstock.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.lock_timeout_ms", 5000)?
            .set_default("database.write_attempts", 3)?
            .set_default("ledger.expiry_alert_days", DEFAULT_EXPIRY_ALERT_DAYS)?
            .set_default("ledger.currency", DEFAULT_CURRENCY)?
            .add_source(File::with_name("sweetstock").required(false))
            .add_source(
                Environment::with_prefix("SWEETSTOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// `host:port` to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Database pool configuration derived from these settings.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .lock_timeout(Duration::from_millis(self.database.lock_timeout_ms))
            .write_attempts(self.database.write_attempts)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseSettings {
                path: "sweetstock.db".to_string(),
                max_connections: 5,
                lock_timeout_ms: 5000,
                write_attempts: 3,
            },
            ledger: LedgerSettings {
                expiry_alert_days: DEFAULT_EXPIRY_ALERT_DAYS,
                currency: DEFAULT_CURRENCY.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_from_settings() {
        let mut settings = Settings::default();
        settings.database.lock_timeout_ms = 250;
        settings.database.write_attempts = 0;

        let db = settings.db_config();
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.write_policy.lock_timeout, Duration::from_millis(250));
        assert_eq!(db.write_policy.write_attempts, 1);
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
    }
}
