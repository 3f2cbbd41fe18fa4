use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use ledgerist::auth::Session;
use ledgerist::cleanup::TombstoneCollector;
use ledgerist::entities::{budget, preferences, recurring_transaction, transaction};
use ledgerist::remote::{Collection, DocumentRef, InMemoryRemote, RemoteError, RemoteStore};
use ledgerist::repositories::{
    BudgetRepository, PreferencesRepository, RecurringTransactionRepository, TransactionRepository,
};
use ledgerist::storage::LocalStorage;
use ledgerist::sync::SyncService;
use ledgerist::utils::datetime;

fn txn(id: i32, is_deleted: bool, last_modified: i64) -> transaction::Model {
    transaction::Model {
        id,
        amount: 10.0,
        category: "Misc".to_string(),
        txn_type: "expense".to_string(),
        date: "2026-06-01".to_string(),
        notes: None,
        payment_method: None,
        tags: None,
        is_deleted,
        last_modified,
    }
}

fn recurring(id: i32, is_deleted: bool, last_modified: i64) -> recurring_transaction::Model {
    recurring_transaction::Model {
        id,
        amount: 15.0,
        category: "Streaming".to_string(),
        txn_type: "expense".to_string(),
        frequency: "monthly".to_string(),
        start_date: "2026-01-01".to_string(),
        end_date: None,
        notes: None,
        last_materialized: None,
        is_deleted,
        last_modified,
    }
}

fn budget_row(category: &str, is_deleted: bool, last_modified: i64) -> budget::Model {
    budget::Model {
        category: category.to_string(),
        period_label: "2026-06".to_string(),
        limit_amount: 100.0,
        is_deleted,
        last_modified,
    }
}

async fn storage() -> Arc<LocalStorage> {
    Arc::new(LocalStorage::new_in_memory().await.unwrap())
}

#[tokio::test]
async fn test_retention_boundary_local_and_remote() {
    let storage = storage().await;
    let remote = Arc::new(InMemoryRemote::new());
    let auth = Arc::new(Session::signed_in("u1"));

    // 29-day tombstone survives; 31-day tombstones are erased; live rows stay
    TransactionRepository::upsert(&storage.conn, txn(1, true, datetime::ms_days_ago(29)))
        .await
        .unwrap();
    TransactionRepository::upsert(&storage.conn, txn(2, true, datetime::ms_days_ago(31)))
        .await
        .unwrap();
    TransactionRepository::upsert(&storage.conn, txn(3, false, datetime::now_ms()))
        .await
        .unwrap();
    RecurringTransactionRepository::upsert(&storage.conn, recurring(1, true, datetime::ms_days_ago(31)))
        .await
        .unwrap();
    BudgetRepository::upsert(&storage.conn, budget_row("Dining", true, datetime::ms_days_ago(31)))
        .await
        .unwrap();

    // Mirror everything to the remote store first
    let service = SyncService::new(storage.clone(), remote.clone(), auth.clone());
    assert!(service.full_sync("d1").await.unwrap().is_successful());
    assert_eq!(remote.len(Collection::Transactions), 3);

    let collector = TombstoneCollector::new(storage.clone(), remote.clone(), auth);
    let stats = collector.collect().await;

    assert_eq!(stats.local_erased, 3);
    assert_eq!(stats.remote_erased, 3);

    let ids: Vec<i32> = TransactionRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert!(RecurringTransactionRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap()
        .is_empty());
    assert!(BudgetRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap()
        .is_empty());

    // Remote: expired documents gone, fresh tombstone and live row remain
    assert!(remote.document(Collection::Transactions, "2").is_none());
    assert!(remote.document(Collection::Transactions, "1").is_some());
    assert!(remote.document(Collection::Transactions, "3").is_some());
    assert!(remote.document(Collection::RecurringTransactions, "1").is_none());
    assert!(remote.document(Collection::Budgets, "Dining_2026-06").is_none());
}

#[tokio::test]
async fn test_remote_pass_requires_authentication() {
    let storage = storage().await;
    let remote = Arc::new(InMemoryRemote::new());
    let auth = Arc::new(Session::signed_in("u1"));

    TransactionRepository::upsert(&storage.conn, txn(1, true, datetime::ms_days_ago(31)))
        .await
        .unwrap();
    let service = SyncService::new(storage.clone(), remote.clone(), auth.clone());
    assert!(service.full_sync("d1").await.unwrap().is_successful());

    auth.sign_out();
    let collector = TombstoneCollector::new(storage.clone(), remote.clone(), auth);
    let stats = collector.collect().await;

    // Local erase still happens; the remote document waits for an
    // authenticated cycle
    assert_eq!(stats.local_erased, 1);
    assert_eq!(stats.remote_erased, 0);
    assert!(remote.document(Collection::Transactions, "1").is_some());
}

#[tokio::test]
async fn test_preferences_tombstones_are_not_collected() {
    let storage = storage().await;
    let remote = Arc::new(InMemoryRemote::new());
    let auth = Arc::new(Session::signed_in("u1"));

    PreferencesRepository::upsert(
        &storage.conn,
        preferences::Model {
            id: 1,
            currency: "USD".to_string(),
            theme: "light".to_string(),
            notifications_enabled: false,
            is_deleted: true,
            last_modified: datetime::ms_days_ago(60),
        },
    )
    .await
    .unwrap();

    let collector = TombstoneCollector::new(storage.clone(), remote, auth);
    let stats = collector.collect().await;

    assert_eq!(stats.local_erased, 0);
    assert!(PreferencesRepository::get_including_deleted(&storage.conn)
        .await
        .unwrap()
        .is_some());
}

/// Remote whose tombstone queries always fail.
struct BrokenRemote {
    inner: InMemoryRemote,
}

#[async_trait]
impl RemoteStore for BrokenRemote {
    async fn merge_upsert(&self, collection: Collection, key: &str, document: Value) -> Result<(), RemoteError> {
        self.inner.merge_upsert(collection, key, document).await
    }

    async fn query_by_owner(&self, collection: Collection, owner_id: &str) -> Result<Vec<Value>, RemoteError> {
        self.inner.query_by_owner(collection, owner_id).await
    }

    async fn query_tombstones_older_than(
        &self,
        _collection: Collection,
        _owner_id: &str,
        _threshold: DateTime<Utc>,
    ) -> Result<Vec<DocumentRef>, RemoteError> {
        Err(RemoteError::Network("gateway timeout".to_string()))
    }

    async fn batch_delete(&self, refs: Vec<DocumentRef>) -> Result<(), RemoteError> {
        self.inner.batch_delete(refs).await
    }
}

#[tokio::test]
async fn test_remote_failure_does_not_abort_local_pass() {
    let storage = storage().await;
    let remote = Arc::new(BrokenRemote {
        inner: InMemoryRemote::new(),
    });
    let auth = Arc::new(Session::signed_in("u1"));

    TransactionRepository::upsert(&storage.conn, txn(1, true, datetime::ms_days_ago(40)))
        .await
        .unwrap();

    let collector = TombstoneCollector::new(storage.clone(), remote, auth);
    let stats = collector.collect().await;

    assert_eq!(stats.local_erased, 1);
    assert_eq!(stats.remote_erased, 0);
    assert!(TransactionRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_custom_retention_threshold() {
    let storage = storage().await;
    let remote = Arc::new(InMemoryRemote::new());
    let auth = Arc::new(Session::signed_in("u1"));

    TransactionRepository::upsert(&storage.conn, txn(1, true, datetime::ms_days_ago(10)))
        .await
        .unwrap();

    let collector = TombstoneCollector::new(storage.clone(), remote, auth).with_retention_days(7);
    let stats = collector.collect().await;

    assert_eq!(stats.local_erased, 1);
}
