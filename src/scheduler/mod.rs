//! Sync scheduling: decides *when* a full sync runs.
//!
//! Three trigger paths funnel into [`SyncService::full_sync`]: the
//! periodic schedule (interval + device constraints, driven by the
//! [`host::SchedulerHost`]), manual user-triggered syncs, and the
//! post-authentication sync after sign-in/sign-up. All three share the
//! orchestrator's single in-flight guard, so at most one full sync runs
//! at a time regardless of trigger.
//!
//! A second, independent daily schedule materializes due occurrences of
//! recurring transactions; it needs no network.

pub mod host;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use log::{info, warn};
use tokio::sync::watch;

use crate::auth::AuthProvider;
use crate::constants::{
    ERROR_NOT_AUTHENTICATED, FULL_SYNC_JOB, MATERIALIZE_INITIAL_DELAY_SECS, MATERIALIZE_JOB,
    MATERIALIZE_PERIOD_HOURS, MIN_SYNC_INTERVAL_HOURS, SYNC_FLEX_MINUTES,
};
use crate::device::DeviceIdentity;
use crate::recurring::RecurringMaterializer;
use crate::repositories::SyncStateRepository;
use crate::storage::LocalStorage;
use crate::sync::{FullSyncResult, SyncError, SyncService, SyncStatus};
use crate::utils::datetime;
use host::{JobConstraints, JobFn, JobSpec, JobState, NetworkRequirement, SchedulerHost};

/// Options for the periodic full-sync schedule.
#[derive(Clone, Debug)]
pub struct SyncOptions {
    pub interval_hours: u64,
    pub require_unmetered: bool,
    pub require_charging: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            interval_hours: 6,
            require_unmetered: true,
            require_charging: false,
        }
    }
}

/// Scheduler for full syncs and recurring-transaction materialization.
pub struct SyncScheduler {
    service: Arc<SyncService>,
    host: Arc<dyn SchedulerHost>,
    auth: Arc<dyn AuthProvider>,
    device: Arc<DeviceIdentity>,
    storage: Arc<LocalStorage>,
}

impl SyncScheduler {
    pub fn new(
        service: Arc<SyncService>,
        host: Arc<dyn SchedulerHost>,
        auth: Arc<dyn AuthProvider>,
        device: Arc<DeviceIdentity>,
        storage: Arc<LocalStorage>,
    ) -> Self {
        Self {
            service,
            host,
            auth,
            device,
            storage,
        }
    }

    /// Enable periodic background sync.
    ///
    /// Rejected outright while unauthenticated. Persists the enabled
    /// flag and options, enqueues the periodic job (replacing any
    /// existing one under the same name, interval clamped to the 1-hour
    /// floor), then runs an immediate enabling sync. A failed enabling
    /// sync rolls the persisted flag back and cancels the job.
    pub async fn enable_sync(&self, options: SyncOptions) -> Result<FullSyncResult> {
        if !self.auth.is_authenticated() {
            bail!(ERROR_NOT_AUTHENTICATED);
        }

        let interval_hours = options.interval_hours.max(MIN_SYNC_INTERVAL_HOURS);
        if interval_hours != options.interval_hours {
            info!(
                "Sync interval {}h below the floor, clamped to {}h",
                options.interval_hours, interval_hours
            );
        }

        let mut state = SyncStateRepository::get_or_default(&self.storage.conn).await?;
        state.sync_enabled = true;
        state.interval_hours = interval_hours as i64;
        state.require_unmetered = options.require_unmetered;
        state.require_charging = options.require_charging;
        SyncStateRepository::save(&self.storage.conn, state).await?;

        let spec = JobSpec {
            name: FULL_SYNC_JOB.to_string(),
            every: Duration::from_secs(interval_hours * 3600),
            flex: Duration::from_secs(SYNC_FLEX_MINUTES * 60),
            // The enabling sync below covers "now"; the first periodic
            // firing lands one interval out.
            initial_delay: Duration::from_secs(interval_hours * 3600),
            constraints: JobConstraints {
                network: if options.require_unmetered {
                    NetworkRequirement::Unmetered
                } else {
                    NetworkRequirement::Connected
                },
                requires_charging: options.require_charging,
                requires_battery_not_low: true,
            },
        };
        self.host.enqueue(spec, self.sync_job()).await?;

        match self.run_tracked_sync().await {
            Ok(result) if result.is_successful() => {
                info!("Periodic sync enabled, every {interval_hours}h");
                Ok(result)
            }
            Ok(result) => {
                let summary = result
                    .error_summary()
                    .unwrap_or_else(|| "sync failed".to_string());
                self.rollback_enable().await;
                bail!("Sync enablement failed: {summary}")
            }
            Err(e) => {
                self.rollback_enable().await;
                Err(e)
            }
        }
    }

    /// Disable periodic background sync.
    pub async fn disable_sync(&self) -> Result<()> {
        self.host.cancel(FULL_SYNC_JOB).await?;
        SyncStateRepository::set_enabled(&self.storage.conn, false).await?;
        info!("Periodic sync disabled");
        Ok(())
    }

    /// Whether periodic sync is enabled, per the persisted flag.
    pub async fn is_sync_enabled(&self) -> Result<bool> {
        Ok(SyncStateRepository::get(&self.storage.conn)
            .await?
            .map(|s| s.sync_enabled)
            .unwrap_or(false))
    }

    /// Run a full sync now, outside the periodic schedule.
    ///
    /// A sync already in flight yields the distinct "already in
    /// progress" error without touching any store.
    pub async fn manual_sync(&self) -> Result<FullSyncResult> {
        self.run_tracked_sync().await
    }

    /// Full sync triggered after sign-in/sign-up.
    pub async fn sync_on_authentication(&self) -> Result<FullSyncResult> {
        self.run_tracked_sync().await
    }

    /// Last successful sync completion time (epoch ms), for display only.
    pub async fn last_sync_time(&self) -> Result<Option<i64>> {
        Ok(SyncStateRepository::get(&self.storage.conn)
            .await?
            .and_then(|s| s.last_sync))
    }

    /// Current state of the periodic full-sync job.
    pub async fn sync_job_state(&self) -> JobState {
        self.host.state(FULL_SYNC_JOB).await
    }

    /// Status stream for display consumers.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.service.status()
    }

    /// Register the daily recurring-transaction materialization
    /// schedule. Independent of the sync schedule; no network required.
    pub async fn schedule_recurring_materialization(&self) -> Result<()> {
        let materializer = RecurringMaterializer::new(self.storage.clone());
        let spec = JobSpec {
            name: MATERIALIZE_JOB.to_string(),
            every: Duration::from_secs(MATERIALIZE_PERIOD_HOURS * 3600),
            flex: Duration::from_secs(SYNC_FLEX_MINUTES * 60),
            initial_delay: Duration::from_secs(MATERIALIZE_INITIAL_DELAY_SECS),
            constraints: JobConstraints::default(),
        };
        let job: JobFn = Arc::new(move || {
            let materializer = materializer.clone();
            Box::pin(async move {
                let created = materializer.materialize_due().await?;
                if created > 0 {
                    info!("Materialized {created} recurring occurrences");
                }
                Ok(())
            })
        });
        self.host.enqueue(spec, job).await
    }

    fn sync_job(&self) -> JobFn {
        let service = self.service.clone();
        let device = self.device.clone();
        let storage = self.storage.clone();
        Arc::new(move || {
            let service = service.clone();
            let device = device.clone();
            let storage = storage.clone();
            Box::pin(async move {
                let device_id = device.get()?;
                match service.full_sync(&device_id).await {
                    Err(SyncError::AlreadyInProgress) => {
                        // Another trigger path holds the sync guard
                        info!("Periodic sync skipped: already in progress");
                        Ok(())
                    }
                    Ok(result) => match result.error_summary() {
                        None => Ok(()),
                        Some(summary) => {
                            let _ = SyncStateRepository::record_error(&storage.conn, &summary).await;
                            bail!(summary)
                        }
                    },
                }
            })
        })
    }

    async fn run_tracked_sync(&self) -> Result<FullSyncResult> {
        let device_id = self.device.get()?;
        let result = self.service.full_sync(&device_id).await?;
        if result.is_successful() {
            SyncStateRepository::record_sync(&self.storage.conn, datetime::now_ms()).await?;
        } else if let Some(summary) = result.error_summary() {
            SyncStateRepository::record_error(&self.storage.conn, &summary).await?;
        }
        Ok(result)
    }

    async fn rollback_enable(&self) {
        if let Err(e) = SyncStateRepository::set_enabled(&self.storage.conn, false).await {
            warn!("Failed to roll back sync-enabled flag: {e:#}");
        }
        if let Err(e) = self.host.cancel(FULL_SYNC_JOB).await {
            warn!("Failed to cancel periodic sync job: {e:#}");
        }
    }
}
