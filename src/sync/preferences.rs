use anyhow::Result;
use log::debug;

use crate::remote::{Collection, PreferencesDocument};
use crate::repositories::PreferencesRepository;
use crate::sync::{resolve_pull, SyncOutcome, SyncService};

impl SyncService {
    /// Synchronize the preferences document. One document per owner,
    /// keyed by the owner id itself.
    pub(crate) async fn sync_preferences(&self, owner_id: &str, device_id: &str) -> SyncOutcome {
        match self.push_pull_preferences(owner_id, device_id).await {
            Ok(pulled) => SyncOutcome::Success { pulled },
            Err(e) => SyncOutcome::Error { message: e.to_string() },
        }
    }

    async fn push_pull_preferences(&self, owner_id: &str, device_id: &str) -> Result<usize> {
        if let Some(row) = PreferencesRepository::get_including_deleted(&self.storage.conn).await? {
            debug!("Pushing preferences");
            let document = PreferencesDocument::from_local(&row, owner_id, device_id)?;
            self.remote
                .merge_upsert(Collection::Preferences, owner_id, serde_json::to_value(&document)?)
                .await?;
        }

        let documents = self.remote.query_by_owner(Collection::Preferences, owner_id).await?;
        let pulled = documents.len();
        for document in documents {
            let incoming = serde_json::from_value::<PreferencesDocument>(document)?.into_local();
            let existing = PreferencesRepository::get_including_deleted(&self.storage.conn).await?;
            let resolved = resolve_pull(existing, incoming);
            PreferencesRepository::upsert(&self.storage.conn, resolved).await?;
        }
        Ok(pulled)
    }
}
