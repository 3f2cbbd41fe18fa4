//! Sync scheduler bookkeeping. Local-only, never pushed to the remote
//! store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub sync_enabled: bool,
    pub interval_hours: i64,
    pub require_unmetered: bool,
    pub require_charging: bool,
    /// Epoch ms of the last successful manual or post-auth sync,
    /// for user-facing display only
    pub last_sync: Option<i64>,
    pub last_error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
