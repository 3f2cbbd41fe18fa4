//! Preferences repository for database operations.

use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::constants::PREFERENCES_ROW_ID;
use crate::entities::preferences;

/// Repository for the single-row preferences table.
pub struct PreferencesRepository;

impl PreferencesRepository {
    /// Get the preferences row, if present and not tombstoned.
    pub async fn get<C>(conn: &C) -> Result<Option<preferences::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(preferences::Entity::find()
            .filter(preferences::Column::Id.eq(PREFERENCES_ROW_ID))
            .filter(preferences::Column::IsDeleted.eq(false))
            .one(conn)
            .await?)
    }

    /// Get the preferences row regardless of tombstone state.
    pub async fn get_including_deleted<C>(conn: &C) -> Result<Option<preferences::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(preferences::Entity::find()
            .filter(preferences::Column::Id.eq(PREFERENCES_ROW_ID))
            .one(conn)
            .await?)
    }

    /// Insert-or-replace the preferences row.
    pub async fn upsert<C>(conn: &C, row: preferences::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let active = preferences::ActiveModel {
            id: ActiveValue::Set(PREFERENCES_ROW_ID),
            currency: ActiveValue::Set(row.currency),
            theme: ActiveValue::Set(row.theme),
            notifications_enabled: ActiveValue::Set(row.notifications_enabled),
            is_deleted: ActiveValue::Set(row.is_deleted),
            last_modified: ActiveValue::Set(row.last_modified),
        };

        preferences::Entity::insert(active)
            .on_conflict(
                OnConflict::column(preferences::Column::Id)
                    .update_columns([
                        preferences::Column::Currency,
                        preferences::Column::Theme,
                        preferences::Column::NotificationsEnabled,
                        preferences::Column::IsDeleted,
                        preferences::Column::LastModified,
                    ])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }
}
