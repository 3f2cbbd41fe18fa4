//! Scheduler host seam: named periodic jobs with execution constraints.
//!
//! The sync scheduler decides *what* runs and with which options; the
//! host owns the actual timers. [`TokioSchedulerHost`] is the in-process
//! default; a platform job scheduler with durable queues slots in behind
//! the same trait.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use tokio::task::JoinHandle;

/// Work executed on each firing of a periodic job.
pub type JobFn = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Network condition a job requires before it may fire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NetworkRequirement {
    #[default]
    None,
    Connected,
    Unmetered,
}

/// Current network condition reported by the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkStatus {
    Offline,
    Metered,
    Unmetered,
}

/// Execution constraints attached to a periodic job.
#[derive(Copy, Clone, Debug, Default)]
pub struct JobConstraints {
    pub network: NetworkRequirement,
    pub requires_charging: bool,
    pub requires_battery_not_low: bool,
}

/// A named periodic job definition.
#[derive(Clone, Debug)]
pub struct JobSpec {
    pub name: String,
    pub every: Duration,
    /// Re-check window while constraints are unmet
    pub flex: Duration,
    pub initial_delay: Duration,
    pub constraints: JobConstraints,
}

/// Lifecycle of one named schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    Unscheduled,
    Enqueued,
    Running,
    Succeeded,
    Failed,
}

/// Host interface: enqueue/cancel named periodic jobs and report their
/// state. Enqueueing under an existing name replaces that job, so at
/// most one job exists per name.
#[async_trait]
pub trait SchedulerHost: Send + Sync {
    async fn enqueue(&self, spec: JobSpec, job: JobFn) -> Result<()>;
    async fn cancel(&self, name: &str) -> Result<()>;
    async fn state(&self, name: &str) -> JobState;
}

/// Device facts gating constraint-bound jobs.
pub trait DeviceStateProbe: Send + Sync {
    fn network_status(&self) -> NetworkStatus;
    fn is_charging(&self) -> bool;
    fn is_battery_low(&self) -> bool;
}

/// Probe for hosts without platform network/battery reporting: every
/// constraint is satisfied.
pub struct UnrestrictedProbe;

impl DeviceStateProbe for UnrestrictedProbe {
    fn network_status(&self) -> NetworkStatus {
        NetworkStatus::Unmetered
    }

    fn is_charging(&self) -> bool {
        true
    }

    fn is_battery_low(&self) -> bool {
        false
    }
}

pub(crate) fn constraints_met(probe: &dyn DeviceStateProbe, constraints: &JobConstraints) -> bool {
    let network_ok = match constraints.network {
        NetworkRequirement::None => true,
        NetworkRequirement::Connected => probe.network_status() != NetworkStatus::Offline,
        NetworkRequirement::Unmetered => probe.network_status() == NetworkStatus::Unmetered,
    };
    network_ok
        && (!constraints.requires_charging || probe.is_charging())
        && (!constraints.requires_battery_not_low || !probe.is_battery_low())
}

struct JobHandle {
    task: JoinHandle<()>,
    state: Arc<RwLock<JobState>>,
}

fn set_state(state: &Arc<RwLock<JobState>>, value: JobState) {
    if let Ok(mut s) = state.write() {
        *s = value;
    }
}

/// In-process scheduler host driving jobs on the tokio runtime.
///
/// Jobs live for the process lifetime only; persistence across restarts
/// is a property of a platform host behind the same trait.
pub struct TokioSchedulerHost {
    probe: Arc<dyn DeviceStateProbe>,
    jobs: tokio::sync::Mutex<HashMap<String, JobHandle>>,
}

impl TokioSchedulerHost {
    pub fn new(probe: Arc<dyn DeviceStateProbe>) -> Self {
        Self {
            probe,
            jobs: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Host whose constraints are always satisfied.
    pub fn unrestricted() -> Self {
        Self::new(Arc::new(UnrestrictedProbe))
    }
}

#[async_trait]
impl SchedulerHost for TokioSchedulerHost {
    async fn enqueue(&self, spec: JobSpec, job: JobFn) -> Result<()> {
        let JobSpec {
            name,
            every,
            flex,
            initial_delay,
            constraints,
        } = spec;

        let mut jobs = self.jobs.lock().await;
        if let Some(existing) = jobs.remove(&name) {
            existing.task.abort();
            info!("Replacing scheduled job '{name}'");
        }

        let state = Arc::new(RwLock::new(JobState::Enqueued));
        let task_state = state.clone();
        let probe = self.probe.clone();
        let task_name = name.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                if !constraints_met(probe.as_ref(), &constraints) {
                    set_state(&task_state, JobState::Enqueued);
                    tokio::time::sleep(flex).await;
                    continue;
                }

                set_state(&task_state, JobState::Running);
                match job().await {
                    Ok(()) => set_state(&task_state, JobState::Succeeded),
                    Err(e) => {
                        warn!("Scheduled job '{task_name}' failed: {e:#}");
                        set_state(&task_state, JobState::Failed);
                    }
                }

                tokio::time::sleep(every).await;
                set_state(&task_state, JobState::Enqueued);
            }
        });

        jobs.insert(name, JobHandle { task, state });
        Ok(())
    }

    async fn cancel(&self, name: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        if let Some(handle) = jobs.remove(name) {
            handle.task.abort();
            info!("Cancelled scheduled job '{name}'");
        }
        Ok(())
    }

    async fn state(&self, name: &str) -> JobState {
        let jobs = self.jobs.lock().await;
        jobs.get(name)
            .and_then(|handle| handle.state.read().ok().map(|s| *s))
            .unwrap_or(JobState::Unscheduled)
    }
}
