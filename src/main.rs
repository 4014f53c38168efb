//! CodeRelay Server: ephemeral code-to-blob relay.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use coderelay_cache::MemoryShareStore;
use coderelay_core::config::AppConfig;
use coderelay_core::error::AppError;
use coderelay_core::traits::ShareStore;
use coderelay_database::DatabasePool;
use coderelay_database::repositories::ShareRepository;
use coderelay_service::{RateLimiterRegistry, RelayService};
use coderelay_worker::ExpirySweeper;

#[tokio::main]
async fn main() {
    let env = std::env::var("RELAY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CodeRelay v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Share store ──────────────────────────────────────
    let (store, db_pool) = build_store(&config).await?;

    // ── Step 2: Admission control + relay service ────────────────
    let limiter = Arc::new(RateLimiterRegistry::new(&config.rate_limit));
    tracing::info!(
        enabled = config.rate_limit.enabled,
        burst = config.rate_limit.burst,
        refill_tokens = config.rate_limit.refill_tokens,
        refill_interval_seconds = config.rate_limit.refill_interval_seconds,
        "Rate limiter initialized"
    );

    let relay = Arc::new(RelayService::new(
        Arc::clone(&store),
        Arc::clone(&limiter),
        config.share.clone(),
    ));

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Start expiry sweeper ─────────────────────────────
    let sweeper_handle = if config.sweeper.enabled {
        let mut sweeper = ExpirySweeper::new(Arc::clone(&store), config.sweeper.interval());
        if limiter.idle_ttl().is_some() {
            sweeper = sweeper.with_limiter(Arc::clone(&limiter));
        }
        Some(sweeper.spawn(shutdown_rx))
    } else {
        tracing::info!("Expiry sweeper disabled");
        None
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    let config = Arc::new(config);
    let app_state = coderelay_api::AppState::new(Arc::clone(&config), relay);
    let app = coderelay_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("CodeRelay server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Wait for background tasks ────────────────────────
    if let Some(handle) = sweeper_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Expiry sweeper did not stop within the grace period");
        }
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("CodeRelay server shut down gracefully");
    Ok(())
}

/// Build the configured share store. Returns the pool for the SQLite
/// backend so it can be closed on shutdown.
async fn build_store(
    config: &AppConfig,
) -> Result<(Arc<dyn ShareStore>, Option<DatabasePool>), AppError> {
    match config.store.backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory share store");
            Ok((Arc::new(MemoryShareStore::new()), None))
        }
        "sqlite" => {
            let pool = DatabasePool::connect(&config.database).await?;
            coderelay_database::migration::run_migrations(pool.pool()).await?;

            if !pool.health_check().await? {
                return Err(AppError::service_unavailable(
                    "Database health check failed",
                ));
            }

            let repository = ShareRepository::new(pool.pool().clone());
            Ok((Arc::new(repository), Some(pool)))
        }
        other => Err(AppError::configuration(format!(
            "Unknown store backend '{other}'"
        ))),
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
