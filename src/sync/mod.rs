//! Synchronization engine for the ledgerist application.
//!
//! This module provides the [`SyncService`] struct which reconciles the
//! always-available local store with the remote multi-device cloud store.
//! One full sync runs the four entity syncers (transactions, budgets,
//! recurring transactions, preferences) strictly in that order; each
//! entity pushes every local row including tombstones, then pulls the
//! owner's remote set back into local storage.
//!
//! The service offers:
//! - A single in-flight guard shared by every trigger path (manual,
//!   periodic, post-authentication)
//! - Per-entity outcomes aggregated into a [`FullSyncResult`]
//! - A [`SyncStatus`] watch stream for display consumers

pub mod budgets;
pub mod preferences;
pub mod recurring;
pub mod transactions;

use std::sync::Arc;

use log::{error, info};
use tokio::sync::{watch, Mutex};

use crate::auth::AuthProvider;
use crate::constants::ERROR_NOT_AUTHENTICATED;
use crate::entities::{budget, preferences as preferences_entity, recurring_transaction, transaction};
use crate::remote::RemoteStore;
use crate::storage::LocalStorage;

/// Outcome of synchronizing one entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The entity's push and pull both completed; `pulled` is the number
    /// of remote rows pulled into local storage.
    Success { pulled: usize },
    /// The first failure encountered during push or pull.
    Error { message: String },
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success { .. })
    }
}

/// Aggregated result of one full synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullSyncResult {
    pub transactions: SyncOutcome,
    pub budgets: SyncOutcome,
    pub recurring_transactions: SyncOutcome,
    pub preferences: SyncOutcome,
}

impl FullSyncResult {
    /// Uniform-failure aggregate, used when the whole run is refused
    /// before any entity syncer starts.
    pub fn all_failed(message: impl Into<String>) -> Self {
        let outcome = SyncOutcome::Error {
            message: message.into(),
        };
        Self {
            transactions: outcome.clone(),
            budgets: outcome.clone(),
            recurring_transactions: outcome.clone(),
            preferences: outcome,
        }
    }

    fn entries(&self) -> [(&'static str, &SyncOutcome); 4] {
        [
            ("Transactions", &self.transactions),
            ("Budgets", &self.budgets),
            ("Recurring transactions", &self.recurring_transactions),
            ("Preferences", &self.preferences),
        ]
    }

    /// True iff all four entity outcomes succeeded.
    pub fn is_successful(&self) -> bool {
        self.entries().iter().all(|(_, outcome)| outcome.is_success())
    }

    /// Total rows pulled across all entities.
    pub fn total_pulled(&self) -> usize {
        self.entries()
            .iter()
            .map(|(_, outcome)| match outcome {
                SyncOutcome::Success { pulled } => *pulled,
                SyncOutcome::Error { .. } => 0,
            })
            .sum()
    }

    /// Human-readable summary naming only the failing entities, e.g.
    /// "Budgets - network unreachable". None when everything succeeded.
    pub fn error_summary(&self) -> Option<String> {
        let failures: Vec<String> = self
            .entries()
            .iter()
            .filter_map(|(label, outcome)| match outcome {
                SyncOutcome::Error { message } => Some(format!("{label} - {message}")),
                SyncOutcome::Success { .. } => None,
            })
            .collect();
        if failures.is_empty() {
            None
        } else {
            Some(failures.join(". "))
        }
    }
}

/// Guard rejection, distinct from a sync failure.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Sync already in progress")]
    AlreadyInProgress,
}

/// Represents the current status of a synchronization operation.
///
/// Published on a watch channel so status indicators can follow sync
/// progress without polling.
#[derive(Debug, Clone)]
pub enum SyncStatus {
    /// No sync has run yet, or the service is between syncs
    Idle,
    /// A sync operation is currently in progress
    InProgress,
    /// The last sync operation completed successfully
    Success,
    /// The last sync operation failed
    Error {
        /// Human-readable summary of what went wrong
        message: String,
    },
}

/// Access to the modification timestamp shared by every synced row.
pub trait SyncRow {
    fn last_modified_ms(&self) -> i64;
}

impl SyncRow for transaction::Model {
    fn last_modified_ms(&self) -> i64 {
        self.last_modified
    }
}

impl SyncRow for budget::Model {
    fn last_modified_ms(&self) -> i64 {
        self.last_modified
    }
}

impl SyncRow for recurring_transaction::Model {
    fn last_modified_ms(&self) -> i64 {
        self.last_modified
    }
}

impl SyncRow for preferences_entity::Model {
    fn last_modified_ms(&self) -> i64 {
        self.last_modified
    }
}

/// Single merge-policy seam for the pull step.
///
/// The default resolution overwrites the local row with the remote
/// content unconditionally — no `last_modified` comparison. Known race:
/// a local edit made while a sync is in flight can be reverted by an
/// older remote value. Every entity syncer routes through this function,
/// so a last-write-wins comparison (both sides expose
/// [`SyncRow::last_modified_ms`]) can be substituted here without
/// touching the rest of the engine.
pub fn resolve_pull<T: SyncRow>(local: Option<T>, incoming: T) -> T {
    let _ = local;
    incoming
}

/// Service that reconciles local storage with the remote store for the
/// currently authenticated owner.
pub struct SyncService {
    storage: Arc<LocalStorage>,
    remote: Arc<dyn RemoteStore>,
    auth: Arc<dyn AuthProvider>,
    in_flight: Mutex<()>,
    status_tx: watch::Sender<SyncStatus>,
}

impl SyncService {
    pub fn new(storage: Arc<LocalStorage>, remote: Arc<dyn RemoteStore>, auth: Arc<dyn AuthProvider>) -> Self {
        let (status_tx, _) = watch::channel(SyncStatus::Idle);
        Self {
            storage,
            remote,
            auth,
            in_flight: Mutex::new(()),
            status_tx,
        }
    }

    /// Status stream for display consumers.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// Whether a sync is currently in flight.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run a full synchronization across all four entities.
    ///
    /// At most one full sync runs at a time, whichever path triggered
    /// it; a concurrent call gets [`SyncError::AlreadyInProgress`]
    /// without touching either store. Without an authenticated owner the
    /// run is refused and every entity outcome carries the same error,
    /// again without touching either store.
    pub async fn full_sync(&self, device_id: &str) -> Result<FullSyncResult, SyncError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SyncError::AlreadyInProgress)?;

        let owner_id = match self
            .auth
            .current_owner_id()
            .filter(|_| self.auth.is_authenticated())
        {
            Some(owner) => owner,
            None => {
                self.status_tx.send_replace(SyncStatus::Error {
                    message: ERROR_NOT_AUTHENTICATED.to_string(),
                });
                return Ok(FullSyncResult::all_failed(ERROR_NOT_AUTHENTICATED));
            }
        };

        self.status_tx.send_replace(SyncStatus::InProgress);
        info!("Starting full sync for owner {owner_id} on device {device_id}");

        // Fixed order, strictly sequential: entity N+1 never starts
        // before entity N's push and pull have both completed.
        let transactions = self.sync_transactions(&owner_id, device_id).await;
        let budgets = self.sync_budgets(&owner_id, device_id).await;
        let recurring_transactions = self.sync_recurring_transactions(&owner_id, device_id).await;
        let preferences = self.sync_preferences(&owner_id, device_id).await;

        let result = FullSyncResult {
            transactions,
            budgets,
            recurring_transactions,
            preferences,
        };

        match result.error_summary() {
            None => {
                info!("Full sync completed, {} rows pulled", result.total_pulled());
                self.status_tx.send_replace(SyncStatus::Success);
            }
            Some(summary) => {
                error!("Full sync finished with errors: {summary}");
                self.status_tx.send_replace(SyncStatus::Error { message: summary });
            }
        }

        Ok(result)
    }
}
