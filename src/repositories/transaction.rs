//! Transaction repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::transaction;

/// Repository for transaction-related database operations.
pub struct TransactionRepository;

impl TransactionRepository {
    /// Get all live transactions, newest first. Tombstoned rows are excluded.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(transaction::Entity::find()
            .filter(transaction::Column::IsDeleted.eq(false))
            .order_by_desc(transaction::Column::Date)
            .all(conn)
            .await?)
    }

    /// Get all transactions including tombstones, so deletions can propagate.
    pub async fn get_all_including_deleted<C>(conn: &C) -> Result<Vec<transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(transaction::Entity::find()
            .order_by_asc(transaction::Column::Id)
            .all(conn)
            .await?)
    }

    /// Get a single transaction by local id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(transaction::Entity::find()
            .filter(transaction::Column::Id.eq(id))
            .one(conn)
            .await?)
    }

    /// Insert a new transaction, letting the database assign the id.
    pub async fn insert<C>(conn: &C, row: transaction::ActiveModel) -> Result<transaction::Model>
    where
        C: ConnectionTrait,
    {
        Ok(row.insert(conn).await?)
    }

    /// Insert-or-replace a transaction by its local id.
    pub async fn upsert<C>(conn: &C, row: transaction::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let active = transaction::ActiveModel {
            id: ActiveValue::Set(row.id),
            amount: ActiveValue::Set(row.amount),
            category: ActiveValue::Set(row.category),
            txn_type: ActiveValue::Set(row.txn_type),
            date: ActiveValue::Set(row.date),
            notes: ActiveValue::Set(row.notes),
            payment_method: ActiveValue::Set(row.payment_method),
            tags: ActiveValue::Set(row.tags),
            is_deleted: ActiveValue::Set(row.is_deleted),
            last_modified: ActiveValue::Set(row.last_modified),
        };

        transaction::Entity::insert(active)
            .on_conflict(
                OnConflict::column(transaction::Column::Id)
                    .update_columns([
                        transaction::Column::Amount,
                        transaction::Column::Category,
                        transaction::Column::TxnType,
                        transaction::Column::Date,
                        transaction::Column::Notes,
                        transaction::Column::PaymentMethod,
                        transaction::Column::Tags,
                        transaction::Column::IsDeleted,
                        transaction::Column::LastModified,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Mark a transaction as deleted. The row is retained until
    /// garbage-collected.
    pub async fn soft_delete<C>(conn: &C, id: i32, timestamp_ms: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        transaction::Entity::update_many()
            .col_expr(transaction::Column::IsDeleted, Expr::value(true))
            .col_expr(transaction::Column::LastModified, Expr::value(timestamp_ms))
            .filter(transaction::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Permanently erase tombstoned rows older than the threshold.
    pub async fn delete_tombstones_older_than<C>(conn: &C, threshold_ms: i64) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let res = transaction::Entity::delete_many()
            .filter(transaction::Column::IsDeleted.eq(true))
            .filter(transaction::Column::LastModified.lt(threshold_ms))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
