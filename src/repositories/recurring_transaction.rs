//! Recurring transaction repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::recurring_transaction;

/// Repository for recurring-transaction database operations.
pub struct RecurringTransactionRepository;

impl RecurringTransactionRepository {
    /// Get all live recurring transactions. Tombstoned rows are excluded.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<recurring_transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(recurring_transaction::Entity::find()
            .filter(recurring_transaction::Column::IsDeleted.eq(false))
            .order_by_asc(recurring_transaction::Column::Id)
            .all(conn)
            .await?)
    }

    /// Get all recurring transactions including tombstones.
    pub async fn get_all_including_deleted<C>(conn: &C) -> Result<Vec<recurring_transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(recurring_transaction::Entity::find()
            .order_by_asc(recurring_transaction::Column::Id)
            .all(conn)
            .await?)
    }

    /// Get a single recurring transaction by local id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<recurring_transaction::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(recurring_transaction::Entity::find()
            .filter(recurring_transaction::Column::Id.eq(id))
            .one(conn)
            .await?)
    }

    /// Insert a new recurring transaction, letting the database assign the id.
    pub async fn insert<C>(
        conn: &C,
        row: recurring_transaction::ActiveModel,
    ) -> Result<recurring_transaction::Model>
    where
        C: ConnectionTrait,
    {
        Ok(row.insert(conn).await?)
    }

    /// Insert-or-replace a recurring transaction by its local id.
    pub async fn upsert<C>(conn: &C, row: recurring_transaction::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let active = recurring_transaction::ActiveModel {
            id: ActiveValue::Set(row.id),
            amount: ActiveValue::Set(row.amount),
            category: ActiveValue::Set(row.category),
            txn_type: ActiveValue::Set(row.txn_type),
            frequency: ActiveValue::Set(row.frequency),
            start_date: ActiveValue::Set(row.start_date),
            end_date: ActiveValue::Set(row.end_date),
            notes: ActiveValue::Set(row.notes),
            last_materialized: ActiveValue::Set(row.last_materialized),
            is_deleted: ActiveValue::Set(row.is_deleted),
            last_modified: ActiveValue::Set(row.last_modified),
        };

        recurring_transaction::Entity::insert(active)
            .on_conflict(
                OnConflict::column(recurring_transaction::Column::Id)
                    .update_columns([
                        recurring_transaction::Column::Amount,
                        recurring_transaction::Column::Category,
                        recurring_transaction::Column::TxnType,
                        recurring_transaction::Column::Frequency,
                        recurring_transaction::Column::StartDate,
                        recurring_transaction::Column::EndDate,
                        recurring_transaction::Column::Notes,
                        recurring_transaction::Column::LastMaterialized,
                        recurring_transaction::Column::IsDeleted,
                        recurring_transaction::Column::LastModified,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Record the newest materialized occurrence date.
    ///
    /// Bumps `last_modified` so the advance propagates on the next sync.
    pub async fn mark_materialized<C>(conn: &C, id: i32, date: &str, timestamp_ms: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        recurring_transaction::Entity::update_many()
            .col_expr(
                recurring_transaction::Column::LastMaterialized,
                Expr::value(Some(date.to_string())),
            )
            .col_expr(recurring_transaction::Column::LastModified, Expr::value(timestamp_ms))
            .filter(recurring_transaction::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Mark a recurring transaction as deleted.
    pub async fn soft_delete<C>(conn: &C, id: i32, timestamp_ms: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        recurring_transaction::Entity::update_many()
            .col_expr(recurring_transaction::Column::IsDeleted, Expr::value(true))
            .col_expr(recurring_transaction::Column::LastModified, Expr::value(timestamp_ms))
            .filter(recurring_transaction::Column::Id.eq(id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Permanently erase tombstoned rows older than the threshold.
    pub async fn delete_tombstones_older_than<C>(conn: &C, threshold_ms: i64) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let res = recurring_transaction::Entity::delete_many()
            .filter(recurring_transaction::Column::IsDeleted.eq(true))
            .filter(recurring_transaction::Column::LastModified.lt(threshold_ms))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
