use anyhow::Result;
use log::debug;

use crate::remote::{Collection, TransactionDocument};
use crate::repositories::TransactionRepository;
use crate::sync::{resolve_pull, SyncOutcome, SyncService};

impl SyncService {
    /// Synchronize the transactions collection: push all local rows
    /// (tombstones included, so deletions propagate), then pull the
    /// owner's remote set back into local storage.
    pub(crate) async fn sync_transactions(&self, owner_id: &str, device_id: &str) -> SyncOutcome {
        match self.push_pull_transactions(owner_id, device_id).await {
            Ok(pulled) => SyncOutcome::Success { pulled },
            Err(e) => SyncOutcome::Error { message: e.to_string() },
        }
    }

    async fn push_pull_transactions(&self, owner_id: &str, device_id: &str) -> Result<usize> {
        let rows = TransactionRepository::get_all_including_deleted(&self.storage.conn).await?;
        debug!("Pushing {} transactions", rows.len());
        for row in &rows {
            let document = TransactionDocument::from_local(row, owner_id, device_id)?;
            self.remote
                .merge_upsert(
                    Collection::Transactions,
                    &row.remote_key(),
                    serde_json::to_value(&document)?,
                )
                .await?;
        }

        let documents = self.remote.query_by_owner(Collection::Transactions, owner_id).await?;
        let pulled = documents.len();
        for document in documents {
            let incoming = serde_json::from_value::<TransactionDocument>(document)?.into_local();
            let existing = TransactionRepository::get_by_id(&self.storage.conn, incoming.id).await?;
            let resolved = resolve_pull(existing, incoming);
            TransactionRepository::upsert(&self.storage.conn, resolved).await?;
        }
        Ok(pulled)
    }
}
