//! Ledgerist - an offline-first personal finance tracker core
//!
//! This library keeps transactions, budgets, recurring transactions,
//! and preferences in a local SQLite store that is always the read path
//! for the application, and mirrors them to a remote multi-device cloud
//! store. Its heart is the synchronization engine: per-entity push/pull,
//! a pluggable merge policy, tombstone lifecycle (soft delete + garbage
//! collection), and the scheduling model around it.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`config`] - Application configuration management
//! * [`storage`] - Local database and data persistence
//! * [`sync`] - Synchronization engine between local and remote stores
//! * [`scheduler`] - Periodic, manual, and post-auth sync triggering
//! * [`cleanup`] - Tombstone garbage collection
//! * [`remote`] - Remote store abstraction and document shapes
//! * [`recurring`] - Recurring transaction materialization

/// Authentication provider seam
pub mod auth;

/// Tombstone garbage collection
pub mod cleanup;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Durable per-installation device identity
pub mod device;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging initialization
pub mod logger;

/// Recurring transaction materialization
pub mod recurring;

/// Remote store abstraction for multi-device cloud sync
pub mod remote;

/// Repository layer for database operations
pub mod repositories;

/// Sync scheduling: periodic, manual, and post-auth triggers
pub mod scheduler;

/// Local storage layer for finance data
pub mod storage;

/// Synchronization engine for keeping local and remote data in sync
pub mod sync;

/// Utility functions for date/time handling and other helpers
pub mod utils;

// Re-export entity models for convenient access
pub use entities::{budget, preferences, recurring_transaction, sync_state, transaction};
