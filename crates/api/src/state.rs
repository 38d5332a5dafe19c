use std::sync::Arc;

use seobuilder_core::archetype::ArchetypeCatalog;
use seobuilder_core::idempotency::IdempotencyCache;
use seobuilder_db::models::page::Page;
use seobuilder_storage::StorageBackend;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: seobuilder_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Private blob store holding staging directories and export archives.
    pub storage: Arc<dyn StorageBackend>,
    /// Immutable archetype registry, injected so tests can substitute a
    /// custom set.
    pub catalog: Arc<ArchetypeCatalog>,
    /// Replay cache backing `Idempotency-Key`-gated operations.
    pub idempotency: Arc<IdempotencyCache<Vec<Page>>>,
}
