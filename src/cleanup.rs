//! Tombstone garbage collection.
//!
//! Soft-deleted rows are retained so deletions can propagate to other
//! devices; once a tombstone is older than the retention threshold it is
//! permanently erased, locally and remotely. Cleanup correctness is soft
//! (eventual) — failures are logged and retried on the next cycle, never
//! surfaced to the caller.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::auth::AuthProvider;
use crate::constants::TOMBSTONE_RETENTION_DAYS;
use crate::remote::{Collection, DocumentRef, RemoteStore};
use crate::repositories::{BudgetRepository, RecurringTransactionRepository, TransactionRepository};
use crate::storage::LocalStorage;

/// Totals of one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    pub local_erased: u64,
    pub remote_erased: usize,
}

/// Reclaims storage consumed by expired tombstones.
pub struct TombstoneCollector {
    storage: Arc<LocalStorage>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn AuthProvider>,
    retention_days: i64,
}

impl TombstoneCollector {
    pub fn new(storage: Arc<LocalStorage>, remote: Arc<dyn RemoteStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            storage,
            remote,
            auth,
            retention_days: TOMBSTONE_RETENTION_DAYS,
        }
    }

    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Permanently erase tombstones older than the retention threshold.
    ///
    /// The local and remote passes fail independently; neither aborts
    /// the other. The remote pass only runs with an authenticated
    /// session.
    pub async fn collect(&self) -> CleanupStats {
        let mut stats = CleanupStats::default();
        let threshold = Utc::now() - Duration::days(self.retention_days);

        match self.local_pass(threshold.timestamp_millis()).await {
            Ok(erased) => {
                stats.local_erased = erased;
                if erased > 0 {
                    info!("Erased {erased} expired local tombstones");
                }
            }
            Err(e) => warn!("Local tombstone cleanup failed: {e:#}"),
        }

        match self.remote_pass(threshold).await {
            Ok(erased) => {
                stats.remote_erased = erased;
                if erased > 0 {
                    info!("Erased {erased} expired remote tombstones");
                }
            }
            Err(e) => warn!("Remote tombstone cleanup failed: {e:#}"),
        }

        stats
    }

    async fn local_pass(&self, threshold_ms: i64) -> anyhow::Result<u64> {
        let conn = &self.storage.conn;
        let mut erased = TransactionRepository::delete_tombstones_older_than(conn, threshold_ms).await?;
        erased += RecurringTransactionRepository::delete_tombstones_older_than(conn, threshold_ms).await?;
        erased += BudgetRepository::delete_tombstones_older_than(conn, threshold_ms).await?;
        Ok(erased)
    }

    async fn remote_pass(&self, threshold: DateTime<Utc>) -> anyhow::Result<usize> {
        let owner_id = match self
            .auth
            .current_owner_id()
            .filter(|_| self.auth.is_authenticated())
        {
            Some(owner) => owner,
            // Remote erasure requires a session; tombstones wait for the
            // next authenticated cycle
            None => return Ok(0),
        };

        let mut refs: Vec<DocumentRef> = Vec::new();
        for collection in Collection::TOMBSTONED {
            refs.extend(
                self.remote
                    .query_tombstones_older_than(collection, &owner_id, threshold)
                    .await?,
            );
        }

        let erased = refs.len();
        if !refs.is_empty() {
            // One atomic batch across all three collections
            self.remote.batch_delete(refs).await?;
        }
        Ok(erased)
    }
}
