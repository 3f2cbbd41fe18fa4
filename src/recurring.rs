//! Materialization of recurring transactions.
//!
//! Walks the active recurring definitions and inserts one transaction
//! row per occurrence that has come due, advancing `last_materialized`
//! so occurrences are generated exactly once — the advance syncs to
//! other devices along with the rest of the row.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::warn;
use sea_orm::ActiveValue;

use crate::entities::transaction;
use crate::repositories::{RecurringTransactionRepository, TransactionRepository};
use crate::storage::LocalStorage;
use crate::utils::datetime;

/// Recurrence step of a recurring transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl std::str::FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => anyhow::bail!("Unknown frequency: {other}"),
        }
    }
}

impl Frequency {
    /// The occurrence following `date`.
    pub fn next(self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => datetime::advance_date(date, 1, 0),
            Frequency::Weekly => datetime::advance_date(date, 7, 0),
            Frequency::Monthly => datetime::advance_date(date, 0, 1),
            Frequency::Yearly => datetime::advance_date(date, 0, 12),
        }
    }
}

/// Generates due transaction rows from recurring definitions.
#[derive(Clone)]
pub struct RecurringMaterializer {
    storage: Arc<LocalStorage>,
}

impl RecurringMaterializer {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Materialize every occurrence due up to today.
    pub async fn materialize_due(&self) -> Result<usize> {
        self.materialize_due_on(Local::now().date_naive()).await
    }

    /// Materialize every occurrence due up to `today`, inclusive.
    ///
    /// Returns the number of transaction rows created. A malformed
    /// definition is skipped with a warning rather than aborting the
    /// remaining rows.
    pub async fn materialize_due_on(&self, today: NaiveDate) -> Result<usize> {
        let conn = &self.storage.conn;
        let rows = RecurringTransactionRepository::get_all(conn).await?;
        let mut created = 0;

        for rec in rows {
            let frequency: Frequency = match rec.frequency.parse() {
                Ok(f) => f,
                Err(e) => {
                    warn!("Skipping recurring transaction {}: {e}", rec.id);
                    continue;
                }
            };
            let start = match datetime::parse_date(&rec.start_date) {
                Ok(d) => d,
                Err(e) => {
                    warn!("Skipping recurring transaction {}: bad start date: {e}", rec.id);
                    continue;
                }
            };
            let end = match rec.end_date.as_deref().map(datetime::parse_date).transpose() {
                Ok(d) => d,
                Err(e) => {
                    warn!("Skipping recurring transaction {}: bad end date: {e}", rec.id);
                    continue;
                }
            };

            let mut cursor = match rec.last_materialized.as_deref().map(datetime::parse_date).transpose() {
                Ok(Some(d)) => frequency.next(d),
                Ok(None) => start,
                Err(e) => {
                    warn!("Skipping recurring transaction {}: bad materialization marker: {e}", rec.id);
                    continue;
                }
            };

            let mut newest = None;
            while cursor <= today && end.map_or(true, |e| cursor <= e) {
                let row = transaction::ActiveModel {
                    id: ActiveValue::NotSet,
                    amount: ActiveValue::Set(rec.amount),
                    category: ActiveValue::Set(rec.category.clone()),
                    txn_type: ActiveValue::Set(rec.txn_type.clone()),
                    date: ActiveValue::Set(datetime::format_ymd(cursor)),
                    notes: ActiveValue::Set(rec.notes.clone()),
                    payment_method: ActiveValue::Set(None),
                    tags: ActiveValue::Set(None),
                    is_deleted: ActiveValue::Set(false),
                    last_modified: ActiveValue::Set(datetime::now_ms()),
                };
                TransactionRepository::insert(conn, row).await?;
                newest = Some(cursor);
                cursor = frequency.next(cursor);
                created += 1;
            }

            if let Some(date) = newest {
                RecurringTransactionRepository::mark_materialized(
                    conn,
                    rec.id,
                    &datetime::format_ymd(date),
                    datetime::now_ms(),
                )
                .await?;
            }
        }

        Ok(created)
    }
}
