//! Utility modules for the ledgerist library.
//!
//! Common helpers used across the storage, sync, and scheduling layers.
//!
//! - [`datetime`] - Date parsing/formatting and epoch-millisecond helpers

pub mod datetime;
