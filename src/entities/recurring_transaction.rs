use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: f64,
    pub category: String,
    /// "expense" or "income"
    pub txn_type: String,
    /// "daily", "weekly", "monthly" or "yearly"
    pub frequency: String,
    /// YYYY-MM-DD, first occurrence
    pub start_date: String,
    /// YYYY-MM-DD, last day an occurrence may fall on
    pub end_date: Option<String>,
    pub notes: Option<String>,
    /// Date of the newest occurrence already materialized into a
    /// transaction row; None until the first materialization
    pub last_materialized: Option<String>,
    pub is_deleted: bool,
    pub last_modified: i64,
}

impl Model {
    /// Key under which this row is addressed in the remote collection.
    pub fn remote_key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
