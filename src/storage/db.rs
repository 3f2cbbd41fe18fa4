use std::path::Path;

use anyhow::Result;
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Schema};
use uuid::Uuid;

use crate::entities::{budget, preferences, recurring_transaction, sync_state, transaction};

/// Local storage manager for finance data.
///
/// Owns the SQLite connection used by the repositories, the sync engine,
/// the tombstone collector, and the recurring materializer. Between syncs
/// this store is the source of truth for the rest of the application.
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Open an in-memory database. Each call gets its own database.
    pub async fn new_in_memory() -> Result<Self> {
        // Unique shared-cache name so pooled connections see one database
        // and separate instances in the same process stay isolated.
        let url = format!(
            "sqlite:file:ledgerist_{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        Self::connect(&url).await
    }

    /// Open (or create) a file-backed database.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let url = format!("sqlite://{}?mode=rwc", path.as_ref().display());
        Self::connect(&url).await
    }

    async fn connect(url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(url.to_owned());
        // Single connection: keeps in-memory databases alive for the
        // lifetime of the pool and serializes row writes.
        options.max_connections(1).sqlx_logging(false);

        let conn = Database::connect(options).await?;
        let storage = LocalStorage { conn };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize database schema from the entity definitions.
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut statements: Vec<TableCreateStatement> = vec![
            schema.create_table_from_entity(transaction::Entity),
            schema.create_table_from_entity(budget::Entity),
            schema.create_table_from_entity(recurring_transaction::Entity),
            schema.create_table_from_entity(preferences::Entity),
            schema.create_table_from_entity(sync_state::Entity),
        ];

        for stmt in &mut statements {
            stmt.if_not_exists();
            self.conn.execute(backend.build(&*stmt)).await?;
        }

        Ok(())
    }

    /// Check if the database has any transaction data.
    pub async fn has_data(&self) -> Result<bool> {
        let count = transaction::Entity::find().count(&self.conn).await?;
        Ok(count > 0)
    }

    /// Clear all synced data, e.g. when a different owner signs in.
    /// Scheduler bookkeeping is kept.
    pub async fn clear_all_data(&self) -> Result<()> {
        transaction::Entity::delete_many().exec(&self.conn).await?;
        budget::Entity::delete_many().exec(&self.conn).await?;
        recurring_transaction::Entity::delete_many().exec(&self.conn).await?;
        preferences::Entity::delete_many().exec(&self.conn).await?;
        Ok(())
    }
}
