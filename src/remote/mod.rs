//! Remote store abstraction for multi-device cloud sync.
//!
//! This module defines the interface the sync engine consumes to talk to
//! the cloud document store, along with the document shapes pushed for
//! each entity kind and the common error taxonomy.
//!
//! Documents are JSON objects addressed by (collection, key). Every
//! document carries `owner_id` (scopes queries so multiple devices of the
//! same user share one logical dataset) and `device_id` (observability
//! only), plus the tombstone flag and a UTC modification timestamp.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::PREFERENCES_ROW_ID;
use crate::entities::{budget, preferences, recurring_transaction, transaction};
use crate::utils::datetime;

pub mod memory;

pub use memory::InMemoryRemote;

/// Common error types for remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Remote store error: {0}")]
    Other(String),
}

/// The remote collections mirrored by the sync engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    RecurringTransactions,
    Preferences,
}

impl Collection {
    /// Collections whose tombstones are garbage-collected.
    pub const TOMBSTONED: [Collection; 3] = [
        Collection::Transactions,
        Collection::RecurringTransactions,
        Collection::Budgets,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
            Collection::RecurringTransactions => "recurring_transactions",
            Collection::Preferences => "preferences",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Address of one remote document, as returned by tombstone queries and
/// consumed by batch deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRef {
    pub collection: Collection,
    pub key: String,
}

/// Remote store trait the sync engine and tombstone collector consume.
///
/// Implementations are expected to be multi-device safe: documents are
/// addressed by a per-entity key, queries are scoped by owner, and
/// `merge_upsert` merges fields into any existing document rather than
/// replacing it wholesale.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Field-level merge-upsert of one document.
    async fn merge_upsert(&self, collection: Collection, key: &str, document: Value) -> Result<(), RemoteError>;

    /// All documents in a collection belonging to one owner.
    async fn query_by_owner(&self, collection: Collection, owner_id: &str) -> Result<Vec<Value>, RemoteError>;

    /// References to tombstoned documents last modified before `threshold`.
    async fn query_tombstones_older_than(
        &self,
        collection: Collection,
        owner_id: &str,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<DocumentRef>, RemoteError>;

    /// Delete the referenced documents in one atomic batch. The batch may
    /// span collections.
    async fn batch_delete(&self, refs: Vec<DocumentRef>) -> Result<(), RemoteError>;
}

fn timestamp_of(ms: i64) -> Result<DateTime<Utc>, RemoteError> {
    datetime::ms_to_datetime(ms)
        .ok_or_else(|| RemoteError::InvalidData(format!("timestamp out of range: {ms}")))
}

/// Remote document shape for one transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionDocument {
    pub id: i32,
    pub amount: f64,
    pub category: String,
    pub txn_type: String,
    pub date: String,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub tags: Option<String>,
    pub owner_id: String,
    pub device_id: String,
    pub is_deleted: bool,
    pub last_modified: DateTime<Utc>,
}

impl TransactionDocument {
    pub fn from_local(row: &transaction::Model, owner_id: &str, device_id: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            id: row.id,
            amount: row.amount,
            category: row.category.clone(),
            txn_type: row.txn_type.clone(),
            date: row.date.clone(),
            notes: row.notes.clone(),
            payment_method: row.payment_method.clone(),
            tags: row.tags.clone(),
            owner_id: owner_id.to_string(),
            device_id: device_id.to_string(),
            is_deleted: row.is_deleted,
            last_modified: timestamp_of(row.last_modified)?,
        })
    }

    pub fn into_local(self) -> transaction::Model {
        transaction::Model {
            id: self.id,
            amount: self.amount,
            category: self.category,
            txn_type: self.txn_type,
            date: self.date,
            notes: self.notes,
            payment_method: self.payment_method,
            tags: self.tags,
            is_deleted: self.is_deleted,
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}

/// Remote document shape for one budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetDocument {
    pub category: String,
    pub period_label: String,
    pub limit_amount: f64,
    pub owner_id: String,
    pub device_id: String,
    pub is_deleted: bool,
    pub last_modified: DateTime<Utc>,
}

impl BudgetDocument {
    pub fn from_local(row: &budget::Model, owner_id: &str, device_id: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            category: row.category.clone(),
            period_label: row.period_label.clone(),
            limit_amount: row.limit_amount,
            owner_id: owner_id.to_string(),
            device_id: device_id.to_string(),
            is_deleted: row.is_deleted,
            last_modified: timestamp_of(row.last_modified)?,
        })
    }

    pub fn into_local(self) -> budget::Model {
        budget::Model {
            category: self.category,
            period_label: self.period_label,
            limit_amount: self.limit_amount,
            is_deleted: self.is_deleted,
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}

/// Remote document shape for one recurring transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecurringTransactionDocument {
    pub id: i32,
    pub amount: f64,
    pub category: String,
    pub txn_type: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub last_materialized: Option<String>,
    pub owner_id: String,
    pub device_id: String,
    pub is_deleted: bool,
    pub last_modified: DateTime<Utc>,
}

impl RecurringTransactionDocument {
    pub fn from_local(
        row: &recurring_transaction::Model,
        owner_id: &str,
        device_id: &str,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            id: row.id,
            amount: row.amount,
            category: row.category.clone(),
            txn_type: row.txn_type.clone(),
            frequency: row.frequency.clone(),
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            notes: row.notes.clone(),
            last_materialized: row.last_materialized.clone(),
            owner_id: owner_id.to_string(),
            device_id: device_id.to_string(),
            is_deleted: row.is_deleted,
            last_modified: timestamp_of(row.last_modified)?,
        })
    }

    pub fn into_local(self) -> recurring_transaction::Model {
        recurring_transaction::Model {
            id: self.id,
            amount: self.amount,
            category: self.category,
            txn_type: self.txn_type,
            frequency: self.frequency,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
            last_materialized: self.last_materialized,
            is_deleted: self.is_deleted,
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}

/// Remote document shape for the per-owner preferences document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferencesDocument {
    pub currency: String,
    pub theme: String,
    pub notifications_enabled: bool,
    pub owner_id: String,
    pub device_id: String,
    pub is_deleted: bool,
    pub last_modified: DateTime<Utc>,
}

impl PreferencesDocument {
    pub fn from_local(row: &preferences::Model, owner_id: &str, device_id: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            currency: row.currency.clone(),
            theme: row.theme.clone(),
            notifications_enabled: row.notifications_enabled,
            owner_id: owner_id.to_string(),
            device_id: device_id.to_string(),
            is_deleted: row.is_deleted,
            last_modified: timestamp_of(row.last_modified)?,
        })
    }

    pub fn into_local(self) -> preferences::Model {
        preferences::Model {
            id: PREFERENCES_ROW_ID,
            currency: self.currency,
            theme: self.theme,
            notifications_enabled: self.notifications_enabled,
            is_deleted: self.is_deleted,
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}
