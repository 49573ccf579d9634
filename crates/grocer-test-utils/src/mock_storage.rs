// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage wrapper that fails chosen writes.
//!
//! `FlakyStorage` forwards everything to a real adapter, except that the
//! n-th `upsert_item` or `increment_stats` call can be made to fail once.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use grocer_core::selection::SelectionSession;
use grocer_core::traits::adapter::PluginAdapter;
use grocer_core::traits::storage::StorageAdapter;
use grocer_core::types::{
    AdapterType, BatchResponse, Chat, ChatId, ChatInfo, FeedbackEvent, GroceryItem, HealthStatus,
    ItemStats, SessionKind, SuggestionBatch,
};
use grocer_core::GrocerError;

/// A 1-based call number to fail, and a counter of calls seen.
#[derive(Default)]
struct Trip {
    fail_on: AtomicUsize,
    calls: AtomicUsize,
}

impl Trip {
    fn arm(&self, call: usize) {
        self.calls.store(0, Ordering::SeqCst);
        self.fail_on.store(call, Ordering::SeqCst);
    }

    fn check(&self, what: &str) -> Result<(), GrocerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on.load(Ordering::SeqCst) {
            return Err(GrocerError::Internal(format!("{what} failed (call {call})")));
        }
        Ok(())
    }
}

/// A storage adapter whose item and stats writes can be made to fail.
pub struct FlakyStorage {
    inner: Arc<dyn StorageAdapter>,
    upsert_item: Trip,
    increment_stats: Trip,
}

impl FlakyStorage {
    pub fn new(inner: Arc<dyn StorageAdapter>) -> Self {
        Self {
            inner,
            upsert_item: Trip::default(),
            increment_stats: Trip::default(),
        }
    }

    /// The `call`-th `upsert_item` from now on fails; later ones succeed.
    pub fn fail_upsert_item(&self, call: usize) {
        self.upsert_item.arm(call);
    }

    /// The `call`-th `increment_stats` from now on fails; later ones succeed.
    pub fn fail_increment_stats(&self, call: usize) {
        self.increment_stats.arm(call);
    }
}

#[async_trait]
impl PluginAdapter for FlakyStorage {
    fn name(&self) -> &str {
        "flaky-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl StorageAdapter for FlakyStorage {
    async fn initialize(&self) -> Result<(), GrocerError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), GrocerError> {
        self.inner.close().await
    }

    async fn upsert_chat(&self, chat: &ChatInfo) -> Result<(), GrocerError> {
        self.inner.upsert_chat(chat).await
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, GrocerError> {
        self.inner.list_chats().await
    }

    async fn upsert_item(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
    ) -> Result<(), GrocerError> {
        self.upsert_item.check("upsert_item")?;
        self.inner.upsert_item(chat_id, name, display_name).await
    }

    async fn list_items(&self, chat_id: ChatId) -> Result<Vec<GroceryItem>, GrocerError> {
        self.inner.list_items(chat_id).await
    }

    async fn delete_item(&self, chat_id: ChatId, name: &str) -> Result<bool, GrocerError> {
        self.inner.delete_item(chat_id, name).await
    }

    async fn delete_items(&self, chat_id: ChatId, names: &[String]) -> Result<u64, GrocerError> {
        self.inner.delete_items(chat_id, names).await
    }

    async fn clear_items(&self, chat_id: ChatId) -> Result<u64, GrocerError> {
        self.inner.clear_items(chat_id).await
    }

    async fn increment_stats(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
        accepted: bool,
    ) -> Result<(), GrocerError> {
        self.increment_stats.check("increment_stats")?;
        self.inner
            .increment_stats(chat_id, name, display_name, accepted)
            .await
    }

    async fn get_stats(&self, chat_id: ChatId) -> Result<Vec<ItemStats>, GrocerError> {
        self.inner.get_stats(chat_id).await
    }

    async fn append_feedback(&self, event: &FeedbackEvent) -> Result<(), GrocerError> {
        self.inner.append_feedback(event).await
    }

    async fn list_feedback(&self, chat_id: ChatId) -> Result<Vec<FeedbackEvent>, GrocerError> {
        self.inner.list_feedback(chat_id).await
    }

    async fn insert_batch(&self, batch: &SuggestionBatch) -> Result<(), GrocerError> {
        self.inner.insert_batch(batch).await
    }

    async fn get_batch(&self, batch_id: &str) -> Result<Option<SuggestionBatch>, GrocerError> {
        self.inner.get_batch(batch_id).await
    }

    async fn record_batch_response(
        &self,
        batch_id: &str,
        index: usize,
        response: &BatchResponse,
    ) -> Result<bool, GrocerError> {
        self.inner
            .record_batch_response(batch_id, index, response)
            .await
    }

    async fn release_batch_response(&self, batch_id: &str, index: usize) -> Result<bool, GrocerError> {
        self.inner.release_batch_response(batch_id, index).await
    }

    async fn purge_batches(&self, before: &str) -> Result<u64, GrocerError> {
        self.inner.purge_batches(before).await
    }

    async fn insert_session(&self, session: &SelectionSession) -> Result<(), GrocerError> {
        self.inner.insert_session(session).await
    }

    async fn get_session(
        &self,
        kind: SessionKind,
        session_id: &str,
    ) -> Result<Option<SelectionSession>, GrocerError> {
        self.inner.get_session(kind, session_id).await
    }

    async fn update_session(&self, session: &SelectionSession) -> Result<bool, GrocerError> {
        self.inner.update_session(session).await
    }

    async fn delete_session(
        &self,
        kind: SessionKind,
        session_id: &str,
    ) -> Result<bool, GrocerError> {
        self.inner.delete_session(kind, session_id).await
    }

    async fn purge_sessions(&self, before: &str) -> Result<u64, GrocerError> {
        self.inner.purge_sessions(before).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::temp_storage;

    #[tokio::test]
    async fn fails_only_the_armed_call() {
        let (inner, _dir) = temp_storage().await.unwrap();
        let storage = FlakyStorage::new(inner);
        storage.fail_upsert_item(2);

        storage.upsert_item(1, "milk", "milk").await.unwrap();
        assert!(storage.upsert_item(1, "eggs", "eggs").await.is_err());
        storage.upsert_item(1, "eggs", "eggs").await.unwrap();
        assert_eq!(storage.list_items(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unarmed_wrapper_passes_through() {
        let (inner, _dir) = temp_storage().await.unwrap();
        let storage = FlakyStorage::new(inner);
        storage.increment_stats(1, "milk", "milk", true).await.unwrap();
        assert_eq!(storage.get_stats(1).await.unwrap()[0].accepts, 1);
    }
}
