use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use study_planner_api::config::AppConfig;
use study_planner_api::database::{MemoryUserStore, PgUserStore, UserStore};
use study_planner_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("study_planner_api=info,tower_http=info")),
        )
        .init();

    // Refuse to start without a database and signing secret
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Study Planner API in {:?} mode", config.environment);

    let mut pg_store = None;
    let users: Arc<dyn UserStore> = if config.database.is_memory() {
        tracing::warn!("Using in-memory user store; data is lost on shutdown");
        Arc::new(MemoryUserStore::new())
    } else {
        let store = PgUserStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        store
            .ensure_schema()
            .await
            .context("failed to prepare users table")?;
        pg_store = Some(store.clone());
        Arc::new(store)
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, users).context("failed to initialise auth services")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Study Planner API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(store) = pg_store {
        store.close().await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
