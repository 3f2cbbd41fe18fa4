//! Constants used throughout the application
//!
//! This module centralizes job names, scheduling floors, and other
//! constant values to improve maintainability and consistency.

// Scheduler job names
pub const FULL_SYNC_JOB: &str = "periodic_full_sync";
pub const MATERIALIZE_JOB: &str = "recurring_materialization";

// Scheduling floors honored by the periodic full-sync schedule
pub const MIN_SYNC_INTERVAL_HOURS: u64 = 1;
pub const SYNC_FLEX_MINUTES: u64 = 15;

// Materialization schedule
pub const MATERIALIZE_PERIOD_HOURS: u64 = 24;
pub const MATERIALIZE_INITIAL_DELAY_SECS: u64 = 60;

// Tombstones older than this are permanently erased
pub const TOMBSTONE_RETENTION_DAYS: i64 = 30;

// Singleton row ids
pub const PREFERENCES_ROW_ID: i32 = 1;
pub const SYNC_STATE_ROW_ID: i32 = 1;

// User-facing messages
pub const ERROR_NOT_AUTHENTICATED: &str = "User not authenticated";

// Generated-file banner
pub const CONFIG_GENERATED: &str = "Generated config file";
