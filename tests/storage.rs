use ledgerist::entities::{budget, transaction};
use ledgerist::repositories::{BudgetRepository, SyncStateRepository, TransactionRepository};
use ledgerist::storage::LocalStorage;

fn txn(id: i32, category: &str, is_deleted: bool, last_modified: i64) -> transaction::Model {
    transaction::Model {
        id,
        amount: 20.0,
        category: category.to_string(),
        txn_type: "expense".to_string(),
        date: "2026-08-01".to_string(),
        notes: Some("note".to_string()),
        payment_method: Some("card".to_string()),
        tags: None,
        is_deleted,
        last_modified,
    }
}

#[tokio::test]
async fn test_storage_creation() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}

#[tokio::test]
async fn test_normal_reads_exclude_tombstones() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    TransactionRepository::upsert(&storage.conn, txn(1, "Grocery", false, 1000))
        .await
        .unwrap();
    TransactionRepository::upsert(&storage.conn, txn(2, "Rent", true, 2000))
        .await
        .unwrap();

    let live = TransactionRepository::get_all(&storage.conn).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, 1);

    let all = TransactionRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_soft_delete_sets_tombstone_and_timestamp() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    TransactionRepository::upsert(&storage.conn, txn(1, "Grocery", false, 1000))
        .await
        .unwrap();

    TransactionRepository::soft_delete(&storage.conn, 1, 9999).await.unwrap();

    let row = TransactionRepository::get_by_id(&storage.conn, 1).await.unwrap().unwrap();
    assert!(row.is_deleted);
    assert_eq!(row.last_modified, 9999);
    assert!(TransactionRepository::get_all(&storage.conn).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_replaces_by_local_key() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    TransactionRepository::upsert(&storage.conn, txn(1, "Grocery", false, 1000))
        .await
        .unwrap();
    TransactionRepository::upsert(&storage.conn, txn(1, "Dining", false, 2000))
        .await
        .unwrap();

    let all = TransactionRepository::get_all_including_deleted(&storage.conn)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].category, "Dining");
    assert_eq!(all[0].last_modified, 2000);
}

#[tokio::test]
async fn test_budget_upserts_by_composite_key() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    let row = budget::Model {
        category: "Grocery".to_string(),
        period_label: "2026-08".to_string(),
        limit_amount: 300.0,
        is_deleted: false,
        last_modified: 1000,
    };
    BudgetRepository::upsert(&storage.conn, row.clone()).await.unwrap();
    BudgetRepository::upsert(
        &storage.conn,
        budget::Model {
            limit_amount: 450.0,
            last_modified: 2000,
            ..row.clone()
        },
    )
    .await
    .unwrap();

    // Same key: replaced. Different period: a second row.
    BudgetRepository::upsert(
        &storage.conn,
        budget::Model {
            period_label: "2026-09".to_string(),
            ..row
        },
    )
    .await
    .unwrap();

    let all = BudgetRepository::get_all(&storage.conn).await.unwrap();
    assert_eq!(all.len(), 2);
    let august = BudgetRepository::get_by_key(&storage.conn, "Grocery", "2026-08")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(august.limit_amount, 450.0);
}

#[tokio::test]
async fn test_sync_state_round_trip() {
    let storage = LocalStorage::new_in_memory().await.unwrap();

    assert!(SyncStateRepository::get(&storage.conn).await.unwrap().is_none());
    let state = SyncStateRepository::get_or_default(&storage.conn).await.unwrap();
    assert!(!state.sync_enabled);

    SyncStateRepository::set_enabled(&storage.conn, true).await.unwrap();
    SyncStateRepository::record_sync(&storage.conn, 123_456).await.unwrap();

    let state = SyncStateRepository::get(&storage.conn).await.unwrap().unwrap();
    assert!(state.sync_enabled);
    assert_eq!(state.last_sync, Some(123_456));
    assert!(state.last_error.is_none());

    SyncStateRepository::record_error(&storage.conn, "Budgets - connection reset")
        .await
        .unwrap();
    let state = SyncStateRepository::get(&storage.conn).await.unwrap().unwrap();
    assert_eq!(state.last_error.as_deref(), Some("Budgets - connection reset"));
}

#[tokio::test]
async fn test_clear_all_data_keeps_sync_state() {
    let storage = LocalStorage::new_in_memory().await.unwrap();
    TransactionRepository::upsert(&storage.conn, txn(1, "Grocery", false, 1000))
        .await
        .unwrap();
    SyncStateRepository::set_enabled(&storage.conn, true).await.unwrap();
    assert!(storage.has_data().await.unwrap());

    storage.clear_all_data().await.unwrap();

    assert!(!storage.has_data().await.unwrap());
    let state = SyncStateRepository::get(&storage.conn).await.unwrap().unwrap();
    assert!(state.sync_enabled);
}

#[tokio::test]
async fn test_separate_instances_are_isolated() {
    let a = LocalStorage::new_in_memory().await.unwrap();
    let b = LocalStorage::new_in_memory().await.unwrap();

    TransactionRepository::upsert(&a.conn, txn(1, "Grocery", false, 1000))
        .await
        .unwrap();

    assert!(a.has_data().await.unwrap());
    assert!(!b.has_data().await.unwrap());
}
