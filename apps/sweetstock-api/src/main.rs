//! # SweetStock API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SweetStock API Server                            │
//! │                                                                         │
//! │  Dashboard ───► HTTP (8000) ───► Handlers ───► sweetstock-db ───► SQLite│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sweetstock_api::{app, AppState, Settings};
use sweetstock_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweetstock=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting SweetStock API server...");

    // Load configuration
    let settings = Settings::load()?;
    info!(
        addr = %settings.bind_addr(),
        db_path = %settings.database.path,
        expiry_alert_days = settings.ledger.expiry_alert_days,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(settings.db_config()).await?;

    let addr = settings.bind_addr();
    let state = AppState::new(db.clone(), settings);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
