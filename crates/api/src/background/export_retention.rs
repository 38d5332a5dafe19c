//! Periodic cleanup of old export records and their artifacts.
//!
//! Complements the opportunistic sweep that runs on export creation: a
//! project that stops exporting still gets its stale archives reclaimed.
//! Runs on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use seobuilder_export::lifecycle::{
    sweep_exports_before, EXPORT_RETENTION_HOURS, SWEEP_BATCH_SIZE,
};
use seobuilder_storage::StorageBackend;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the export retention cleanup loop.
///
/// Deletes export rows (and their archives) older than `retention_hours`
/// (defaults to 24). Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, storage: Arc<dyn StorageBackend>, cancel: CancellationToken) {
    let retention_hours: i64 = std::env::var("EXPORT_RETENTION_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(EXPORT_RETENTION_HOURS);

    tracing::info!(
        retention_hours,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Export retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Export retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::hours(retention_hours);
                match sweep_exports_before(&pool, storage.as_ref(), cutoff, SWEEP_BATCH_SIZE).await {
                    Ok(removed) => {
                        if removed > 0 {
                            tracing::info!(removed, "Export retention: purged old exports");
                        } else {
                            tracing::debug!("Export retention: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Export retention: cleanup failed");
                    }
                }
            }
        }
    }
}
