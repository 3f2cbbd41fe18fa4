use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget for one category within one period (e.g. "2026-08").
///
/// Keyed by (category, period_label) — there is at most one budget per
/// category per period.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_label: String,
    pub limit_amount: f64,
    pub is_deleted: bool,
    pub last_modified: i64,
}

impl Model {
    /// Key under which this row is addressed in the remote collection.
    pub fn remote_key(&self) -> String {
        format!("{}_{}", self.category, self.period_label)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
