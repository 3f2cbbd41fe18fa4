use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User preferences. One row per device (fixed id); one document per
/// owner remotely.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "preferences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub currency: String,
    pub theme: String,
    pub notifications_enabled: bool,
    pub is_deleted: bool,
    pub last_modified: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
