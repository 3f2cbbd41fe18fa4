use anyhow::Result;
use log::debug;

use crate::remote::{BudgetDocument, Collection};
use crate::repositories::BudgetRepository;
use crate::sync::{resolve_pull, SyncOutcome, SyncService};

impl SyncService {
    /// Synchronize the budgets collection. Remote documents are keyed by
    /// the derived `category_periodLabel` composite string.
    pub(crate) async fn sync_budgets(&self, owner_id: &str, device_id: &str) -> SyncOutcome {
        match self.push_pull_budgets(owner_id, device_id).await {
            Ok(pulled) => SyncOutcome::Success { pulled },
            Err(e) => SyncOutcome::Error { message: e.to_string() },
        }
    }

    async fn push_pull_budgets(&self, owner_id: &str, device_id: &str) -> Result<usize> {
        let rows = BudgetRepository::get_all_including_deleted(&self.storage.conn).await?;
        debug!("Pushing {} budgets", rows.len());
        for row in &rows {
            let document = BudgetDocument::from_local(row, owner_id, device_id)?;
            self.remote
                .merge_upsert(Collection::Budgets, &row.remote_key(), serde_json::to_value(&document)?)
                .await?;
        }

        let documents = self.remote.query_by_owner(Collection::Budgets, owner_id).await?;
        let pulled = documents.len();
        for document in documents {
            let incoming = serde_json::from_value::<BudgetDocument>(document)?.into_local();
            let existing =
                BudgetRepository::get_by_key(&self.storage.conn, &incoming.category, &incoming.period_label).await?;
            let resolved = resolve_pull(existing, incoming);
            BudgetRepository::upsert(&self.storage.conn, resolved).await?;
        }
        Ok(pulled)
    }
}
