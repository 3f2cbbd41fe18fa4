use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount: f64,
    pub category: String,
    /// "expense" or "income"
    pub txn_type: String,
    /// YYYY-MM-DD
    pub date: String,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    /// Comma-separated tag list
    pub tags: Option<String>,
    pub is_deleted: bool,
    /// Epoch milliseconds, set on every mutation including tombstone sets
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
