//! Event check-in tracker HTTP server.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Opens the `SQLite` database and ensures the schema exists
//! - Serves the scanner, the check-in API and the results report
//! - Closes the database after a graceful shutdown
//!
//! # Usage
//!
//! ```bash
//! PORT=8080 DATABASE_URL=sqlite://db.sqlite cargo run --bin checkin-server
//! ```

mod config;

use anyhow::Context;
use checkin_core::RegistrationStore;
use checkin_sqlite::SqliteRegistrationStore;
use checkin_web::{build_router, AppState};
use config::Config;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkin=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting check-in tracker");

    let config = Config::from_env();
    info!(
        database_url = %config.database.url,
        max_connections = config.database.max_connections,
        static_dir = %config.server.static_dir.display(),
        "Configuration loaded"
    );

    checkin_web::metrics::describe();

    if let Err(e) = std::fs::create_dir_all(&config.server.static_dir) {
        warn!(
            static_dir = %config.server.static_dir.display(),
            error = %e,
            "Could not create static directory"
        );
    }

    // Storage problems at startup are fatal
    let store = match open_store(&config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to initialize storage");
            return Err(e);
        }
    };

    let app = build_router(AppState::from_shared(
        Arc::clone(&store),
        config.server.static_dir.clone(),
    ));

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "HTTP server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("HTTP server stopped, closing database");
    store.close().await;

    served.context("HTTP server failed")?;
    info!("Shutdown complete");
    Ok(())
}

/// Connect to the database and create the schema if needed.
async fn open_store(config: &Config) -> anyhow::Result<SqliteRegistrationStore> {
    let store = SqliteRegistrationStore::connect_with(
        &config.database.url,
        config.database.max_connections,
    )
    .await
    .with_context(|| format!("Failed to open database {}", config.database.url))?;

    let status = store
        .initialize()
        .await
        .context("Failed to prepare registrations table")?;
    info!(table = checkin_sqlite::TABLE_NAME, %status, "Schema ready");

    Ok(store)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
