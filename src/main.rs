//! Coffee Shop - cart, sales ledger and monthly reports
//!
//! Runs the admin server and the customer shop server in one process.

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffee_shop::api::{self, AdminCredentials, AppState};
use coffee_shop::db;
use coffee_shop::store::{MemoryStore, PgStore};
use coffee_shop::{Config, StorageBackend};

/// Initialize tracing/logging, JSON lines in production
fn init_tracing(json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "coffee_shop=debug,tower_http=debug".into()),
    );

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, create missing tables outside production, then verify them
async fn connect_postgres(config: &Config) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    db::verify_connection(&pool).await?;

    if !config.is_production() {
        db::ensure_schema(&pool).await?;
    }
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let admin_addr: SocketAddr = format!("{}:{}", config.host, config.admin_port).parse()?;
    let shop_addr: SocketAddr = format!("{}:{}", config.host, config.shop_port).parse()?;
    let admin = AdminCredentials::new(config.admin_username.clone(), &config.admin_password);

    tracing::info!(
        backend = ?config.storage_backend,
        environment = %config.environment,
        "Starting coffee shop"
    );

    let (state, pool) = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage: data is lost on shutdown");
            let state = AppState::new(Arc::new(MemoryStore::new()), &config.reports_dir, admin);
            (state, None)
        }
        StorageBackend::Postgres => {
            let pool = connect_postgres(&config).await?;
            let store = Arc::new(PgStore::new(pool.clone()));
            (AppState::new(store, &config.reports_dir, admin), Some(pool))
        }
    };

    let state = state.with_session_idle_timeout(config.session_idle_timeout);
    let admin_app = api::build_admin_app(state.clone());
    let shop_app = api::build_shop_app(state);

    let admin_listener = tokio::net::TcpListener::bind(admin_addr).await?;
    let shop_listener = tokio::net::TcpListener::bind(shop_addr).await?;
    tracing::info!("Admin server listening on http://{}", admin_addr);
    tracing::info!("Shop server listening on http://{}", shop_addr);

    tokio::try_join!(
        async {
            axum::serve(admin_listener, admin_app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        },
        async {
            axum::serve(shop_listener, shop_app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        },
    )?;

    tracing::info!("Servers shutting down...");
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }
    tracing::info!("Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
