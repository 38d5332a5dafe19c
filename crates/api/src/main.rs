use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seobuilder_api::config::ServerConfig;
use seobuilder_api::router::build_app_router;
use seobuilder_api::state::AppState;
use seobuilder_core::archetype::ArchetypeCatalog;
use seobuilder_core::idempotency::IdempotencyCache;
use seobuilder_storage::LocalStorage;

/// TTL for idempotency-key replays.
const IDEMPOTENCY_TTL: Duration = Duration::from_secs(24 * 3600);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seobuilder_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = seobuilder_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    seobuilder_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    seobuilder_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Storage ---
    let storage: Arc<dyn seobuilder_storage::StorageBackend> =
        Arc::new(LocalStorage::new(&config.storage_root));
    tracing::info!(root = %config.storage_root, "Local storage backend ready");

    // --- Archetype catalog ---
    let catalog = Arc::new(ArchetypeCatalog::builtin().clone());
    tracing::info!(archetypes = catalog.names().count(), "Archetype catalog loaded");

    // --- Idempotency cache ---
    let idempotency = Arc::new(IdempotencyCache::new(IDEMPOTENCY_TTL));

    // --- Background cleanup ---
    let cancel = CancellationToken::new();
    let retention_handle = tokio::spawn(seobuilder_api::background::export_retention::run(
        pool.clone(),
        Arc::clone(&storage),
        cancel.clone(),
    ));

    // --- App state & router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
        catalog,
        idempotency,
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Stop background tasks before exiting.
    cancel.cancel();
    let _ = retention_handle.await;
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
