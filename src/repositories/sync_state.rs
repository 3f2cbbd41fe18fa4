//! Sync-state repository: persisted scheduler bookkeeping.

use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::constants::{MIN_SYNC_INTERVAL_HOURS, SYNC_STATE_ROW_ID};
use crate::entities::sync_state;

/// Repository for the single-row sync_state table.
pub struct SyncStateRepository;

impl SyncStateRepository {
    /// Get the sync state row, if one has been written.
    pub async fn get<C>(conn: &C) -> Result<Option<sync_state::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(sync_state::Entity::find()
            .filter(sync_state::Column::Id.eq(SYNC_STATE_ROW_ID))
            .one(conn)
            .await?)
    }

    /// Get the sync state row, inserting defaults on first use.
    pub async fn get_or_default<C>(conn: &C) -> Result<sync_state::Model>
    where
        C: ConnectionTrait,
    {
        if let Some(state) = Self::get(conn).await? {
            return Ok(state);
        }
        let default = sync_state::Model {
            id: SYNC_STATE_ROW_ID,
            sync_enabled: false,
            interval_hours: MIN_SYNC_INTERVAL_HOURS as i64,
            require_unmetered: true,
            require_charging: false,
            last_sync: None,
            last_error: None,
        };
        Self::save(conn, default.clone()).await?;
        Ok(default)
    }

    /// Insert-or-replace the sync state row.
    pub async fn save<C>(conn: &C, row: sync_state::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let active = sync_state::ActiveModel {
            id: ActiveValue::Set(SYNC_STATE_ROW_ID),
            sync_enabled: ActiveValue::Set(row.sync_enabled),
            interval_hours: ActiveValue::Set(row.interval_hours),
            require_unmetered: ActiveValue::Set(row.require_unmetered),
            require_charging: ActiveValue::Set(row.require_charging),
            last_sync: ActiveValue::Set(row.last_sync),
            last_error: ActiveValue::Set(row.last_error),
        };

        sync_state::Entity::insert(active)
            .on_conflict(
                OnConflict::column(sync_state::Column::Id)
                    .update_columns([
                        sync_state::Column::SyncEnabled,
                        sync_state::Column::IntervalHours,
                        sync_state::Column::RequireUnmetered,
                        sync_state::Column::RequireCharging,
                        sync_state::Column::LastSync,
                        sync_state::Column::LastError,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Flip the persisted enabled flag without touching the options.
    pub async fn set_enabled<C>(conn: &C, enabled: bool) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let mut state = Self::get_or_default(conn).await?;
        state.sync_enabled = enabled;
        Self::save(conn, state).await
    }

    /// Record a successful sync completion time and clear any stale error.
    pub async fn record_sync<C>(conn: &C, timestamp_ms: i64) -> Result<()>
    where
        C: ConnectionTrait,
    {
        Self::get_or_default(conn).await?;
        sync_state::Entity::update_many()
            .col_expr(sync_state::Column::LastSync, Expr::value(Some(timestamp_ms)))
            .col_expr(sync_state::Column::LastError, Expr::value(Option::<String>::None))
            .filter(sync_state::Column::Id.eq(SYNC_STATE_ROW_ID))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Record the failure summary of the most recent sync attempt.
    pub async fn record_error<C>(conn: &C, message: &str) -> Result<()>
    where
        C: ConnectionTrait,
    {
        Self::get_or_default(conn).await?;
        sync_state::Entity::update_many()
            .col_expr(sync_state::Column::LastError, Expr::value(Some(message.to_string())))
            .filter(sync_state::Column::Id.eq(SYNC_STATE_ROW_ID))
            .exec(conn)
            .await?;
        Ok(())
    }
}
