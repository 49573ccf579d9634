// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use grocer_config::model::StorageConfig;
use grocer_core::selection::SelectionSession;
use grocer_core::types::{
    BatchResponse, Chat, ChatId, ChatInfo, FeedbackEvent, GroceryItem, ItemStats, SessionKind,
    SuggestionBatch,
};
use grocer_core::{AdapterType, GrocerError, HealthStatus, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`]; every
/// other call fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, GrocerError> {
        self.db.get().ok_or_else(|| GrocerError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), GrocerError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| GrocerError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), GrocerError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Chats ---

    async fn upsert_chat(&self, chat: &ChatInfo) -> Result<(), GrocerError> {
        queries::chats::upsert_chat(self.db()?, chat).await
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, GrocerError> {
        queries::chats::list_chats(self.db()?).await
    }

    // --- Grocery list ---

    async fn upsert_item(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
    ) -> Result<(), GrocerError> {
        queries::items::upsert_item(self.db()?, chat_id, name, display_name).await
    }

    async fn list_items(&self, chat_id: ChatId) -> Result<Vec<GroceryItem>, GrocerError> {
        queries::items::list_items(self.db()?, chat_id).await
    }

    async fn delete_item(&self, chat_id: ChatId, name: &str) -> Result<bool, GrocerError> {
        queries::items::delete_item(self.db()?, chat_id, name).await
    }

    async fn delete_items(&self, chat_id: ChatId, names: &[String]) -> Result<u64, GrocerError> {
        queries::items::delete_items(self.db()?, chat_id, names).await
    }

    async fn clear_items(&self, chat_id: ChatId) -> Result<u64, GrocerError> {
        queries::items::clear_items(self.db()?, chat_id).await
    }

    // --- Feedback ---

    async fn increment_stats(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
        accepted: bool,
    ) -> Result<(), GrocerError> {
        queries::feedback::increment_stats(self.db()?, chat_id, name, display_name, accepted).await
    }

    async fn get_stats(&self, chat_id: ChatId) -> Result<Vec<ItemStats>, GrocerError> {
        queries::feedback::get_stats(self.db()?, chat_id).await
    }

    async fn append_feedback(&self, event: &FeedbackEvent) -> Result<(), GrocerError> {
        queries::feedback::append_feedback(self.db()?, event).await
    }

    async fn list_feedback(&self, chat_id: ChatId) -> Result<Vec<FeedbackEvent>, GrocerError> {
        queries::feedback::list_feedback(self.db()?, chat_id).await
    }

    // --- Suggestion batches ---

    async fn insert_batch(&self, batch: &SuggestionBatch) -> Result<(), GrocerError> {
        queries::batches::insert_batch(self.db()?, batch).await
    }

    async fn get_batch(&self, batch_id: &str) -> Result<Option<SuggestionBatch>, GrocerError> {
        queries::batches::get_batch(self.db()?, batch_id).await
    }

    async fn record_batch_response(
        &self,
        batch_id: &str,
        index: usize,
        response: &BatchResponse,
    ) -> Result<bool, GrocerError> {
        queries::batches::record_response(self.db()?, batch_id, index, response).await
    }

    async fn release_batch_response(&self, batch_id: &str, index: usize) -> Result<bool, GrocerError> {
        queries::batches::release_response(self.db()?, batch_id, index).await
    }

    async fn purge_batches(&self, before: &str) -> Result<u64, GrocerError> {
        queries::batches::purge_batches(self.db()?, before).await
    }

    // --- Selection sessions ---

    async fn insert_session(&self, session: &SelectionSession) -> Result<(), GrocerError> {
        queries::sessions::insert_session(self.db()?, session).await
    }

    async fn get_session(
        &self,
        kind: SessionKind,
        session_id: &str,
    ) -> Result<Option<SelectionSession>, GrocerError> {
        queries::sessions::get_session(self.db()?, kind, session_id).await
    }

    async fn update_session(&self, session: &SelectionSession) -> Result<bool, GrocerError> {
        queries::sessions::update_session(self.db()?, session).await
    }

    async fn delete_session(
        &self,
        kind: SessionKind,
        session_id: &str,
    ) -> Result<bool, GrocerError> {
        queries::sessions::delete_session(self.db()?, kind, session_id).await
    }

    async fn purge_sessions(&self, before: &str) -> Result<u64, GrocerError> {
        queries::sessions::purge_sessions(self.db()?, before).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn calls_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        let err = storage.list_items(1).await.unwrap_err();
        assert!(err.to_string().contains("not initialized"), "got: {err}");
        // Shutdown without a database is a no-op.
        storage.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rollback_journal_mode_is_honored() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nowal.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: false,
        });
        storage.initialize().await.unwrap();

        let mode: String = storage
            .db()
            .unwrap()
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_ne!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn list_and_session_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);

        storage.upsert_chat(&ChatInfo::id(11)).await.unwrap();
        storage.upsert_item(11, "milk", "milk").await.unwrap();
        storage.upsert_item(11, "bread", "Bread").await.unwrap();

        let items = storage.list_items(11).await.unwrap();
        let snapshot = items
            .iter()
            .map(|i| grocer_core::types::ItemRef {
                name: i.name.clone(),
                display_name: i.display_name.clone(),
            })
            .collect();
        let mut session = SelectionSession::remove(11, snapshot);
        storage.insert_session(&session).await.unwrap();

        session.toggle(0).unwrap();
        assert!(storage.update_session(&session).await.unwrap());

        let loaded = storage
            .get_session(SessionKind::Remove, &session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.label(0), Some("Bread"));

        assert!(
            storage
                .delete_session(SessionKind::Remove, &session.id)
                .await
                .unwrap()
        );
        assert_eq!(storage.list_chats().await.unwrap().len(), 1);

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
