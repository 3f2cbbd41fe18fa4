use anyhow::Result;
use log::debug;

use crate::remote::{Collection, RecurringTransactionDocument};
use crate::repositories::RecurringTransactionRepository;
use crate::sync::{resolve_pull, SyncOutcome, SyncService};

impl SyncService {
    /// Synchronize the recurring-transactions collection.
    ///
    /// `last_materialized` rides along with the payload, so a
    /// materialization performed on one device is visible to the others
    /// and occurrences are not generated twice.
    pub(crate) async fn sync_recurring_transactions(&self, owner_id: &str, device_id: &str) -> SyncOutcome {
        match self.push_pull_recurring(owner_id, device_id).await {
            Ok(pulled) => SyncOutcome::Success { pulled },
            Err(e) => SyncOutcome::Error { message: e.to_string() },
        }
    }

    async fn push_pull_recurring(&self, owner_id: &str, device_id: &str) -> Result<usize> {
        let rows = RecurringTransactionRepository::get_all_including_deleted(&self.storage.conn).await?;
        debug!("Pushing {} recurring transactions", rows.len());
        for row in &rows {
            let document = RecurringTransactionDocument::from_local(row, owner_id, device_id)?;
            self.remote
                .merge_upsert(
                    Collection::RecurringTransactions,
                    &row.remote_key(),
                    serde_json::to_value(&document)?,
                )
                .await?;
        }

        let documents = self
            .remote
            .query_by_owner(Collection::RecurringTransactions, owner_id)
            .await?;
        let pulled = documents.len();
        for document in documents {
            let incoming = serde_json::from_value::<RecurringTransactionDocument>(document)?.into_local();
            let existing = RecurringTransactionRepository::get_by_id(&self.storage.conn, incoming.id).await?;
            let resolved = resolve_pull(existing, incoming);
            RecurringTransactionRepository::upsert(&self.storage.conn, resolved).await?;
        }
        Ok(pulled)
    }
}
