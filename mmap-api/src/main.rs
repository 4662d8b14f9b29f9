//! MMAP API server.
//!
//! Serves the student roster behind the Auth Gate and receives signed
//! Lovable webhooks.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mmap::demo::{demo_store, DEMO_SCHOOL_ID};
use mmap::{router, AppState, Config, PgStudentStore, StudentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("api_server_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        bearer_auth_configured = config.bearer_auth_enabled(),
        webhook_secret_configured = config.webhook_secret.is_some(),
        database_configured = config.database_url.is_some(),
        "config_loaded"
    );

    // Create student store
    let pg_store = match &config.database_url {
        Some(url) => Some(
            PgStudentStore::connect_lazy(url, config.database_max_connections)
                .context("Invalid DATABASE_URL")?,
        ),
        None => None,
    };
    let store: Arc<dyn StudentStore> = match &pg_store {
        Some(pg) => Arc::new(pg.clone()),
        None => {
            warn!(school_id = DEMO_SCHOOL_ID, "database_not_configured_using_demo_store");
            Arc::new(demo_store())
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(config, store));

    // Bind to address
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "api_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Close pooled database connections
    if let Some(pg) = pg_store {
        pg.close().await;
    }

    info!("api_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("api_server_shutting_down");
}
