//! Budget repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::budget;

/// Repository for budget-related database operations.
///
/// Budgets are keyed by (category, period_label).
pub struct BudgetRepository;

impl BudgetRepository {
    /// Get all live budgets. Tombstoned rows are excluded.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<budget::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(budget::Entity::find()
            .filter(budget::Column::IsDeleted.eq(false))
            .order_by_asc(budget::Column::PeriodLabel)
            .order_by_asc(budget::Column::Category)
            .all(conn)
            .await?)
    }

    /// Get all budgets including tombstones, so deletions can propagate.
    pub async fn get_all_including_deleted<C>(conn: &C) -> Result<Vec<budget::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(budget::Entity::find()
            .order_by_asc(budget::Column::PeriodLabel)
            .order_by_asc(budget::Column::Category)
            .all(conn)
            .await?)
    }

    /// Get a single budget by its composite key.
    pub async fn get_by_key<C>(conn: &C, category: &str, period_label: &str) -> Result<Option<budget::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(budget::Entity::find()
            .filter(budget::Column::Category.eq(category))
            .filter(budget::Column::PeriodLabel.eq(period_label))
            .one(conn)
            .await?)
    }

    /// Insert-or-replace a budget by its composite key.
    pub async fn upsert<C>(conn: &C, row: budget::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let active = budget::ActiveModel {
            category: ActiveValue::Set(row.category),
            period_label: ActiveValue::Set(row.period_label),
            limit_amount: ActiveValue::Set(row.limit_amount),
            is_deleted: ActiveValue::Set(row.is_deleted),
            last_modified: ActiveValue::Set(row.last_modified),
        };

        budget::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([budget::Column::Category, budget::Column::PeriodLabel])
                    .update_columns([
                        budget::Column::LimitAmount,
                        budget::Column::IsDeleted,
                        budget::Column::LastModified,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Mark a budget as deleted. The row is retained until garbage-collected.
    pub async fn soft_delete<C>(conn: &C, category: &str, period_label: &str, timestamp_ms: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        budget::Entity::update_many()
            .col_expr(budget::Column::IsDeleted, Expr::value(true))
            .col_expr(budget::Column::LastModified, Expr::value(timestamp_ms))
            .filter(budget::Column::Category.eq(category))
            .filter(budget::Column::PeriodLabel.eq(period_label))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Permanently erase tombstoned rows older than the threshold.
    pub async fn delete_tombstones_older_than<C>(conn: &C, threshold_ms: i64) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let res = budget::Entity::delete_many()
            .filter(budget::Column::IsDeleted.eq(true))
            .filter(budget::Column::LastModified.lt(threshold_ms))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
