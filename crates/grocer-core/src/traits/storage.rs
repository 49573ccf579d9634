// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the document store (SQLite).

use async_trait::async_trait;

use crate::error::GrocerError;
use crate::selection::SelectionSession;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    BatchResponse, Chat, ChatId, ChatInfo, FeedbackEvent, GroceryItem, ItemStats, SessionKind,
    SuggestionBatch,
};

/// Adapter for the persistence backend.
///
/// One flat collection per entity kind. Each method is atomic on its own;
/// nothing spans collections.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (connection, migrations).
    async fn initialize(&self) -> Result<(), GrocerError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), GrocerError>;

    // --- Chats ---

    /// Registers a chat or refreshes its title and username.
    async fn upsert_chat(&self, chat: &ChatInfo) -> Result<(), GrocerError>;

    /// All registered chats, oldest first.
    async fn list_chats(&self) -> Result<Vec<Chat>, GrocerError>;

    // --- Grocery list ---

    /// Inserts an item or refreshes its display name.
    async fn upsert_item(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
    ) -> Result<(), GrocerError>;

    /// The chat's list ordered by display name.
    async fn list_items(&self, chat_id: ChatId) -> Result<Vec<GroceryItem>, GrocerError>;

    /// Deletes one item. Returns whether it existed.
    async fn delete_item(&self, chat_id: ChatId, name: &str) -> Result<bool, GrocerError>;

    /// Deletes every item whose name is in `names`. Returns the number deleted.
    async fn delete_items(&self, chat_id: ChatId, names: &[String]) -> Result<u64, GrocerError>;

    /// Deletes the whole list. Returns the number deleted.
    async fn clear_items(&self, chat_id: ChatId) -> Result<u64, GrocerError>;

    // --- Feedback ---

    /// Atomically adds one accept or reject, creating a zeroed row if absent.
    async fn increment_stats(
        &self,
        chat_id: ChatId,
        name: &str,
        display_name: &str,
        accepted: bool,
    ) -> Result<(), GrocerError>;

    /// All stats rows for the chat ordered by name.
    async fn get_stats(&self, chat_id: ChatId) -> Result<Vec<ItemStats>, GrocerError>;

    /// Appends one feedback event to the history.
    async fn append_feedback(&self, event: &FeedbackEvent) -> Result<(), GrocerError>;

    /// The chat's feedback history, oldest first.
    async fn list_feedback(&self, chat_id: ChatId) -> Result<Vec<FeedbackEvent>, GrocerError>;

    // --- Suggestion batches ---

    async fn insert_batch(&self, batch: &SuggestionBatch) -> Result<(), GrocerError>;

    /// Loads a batch together with its recorded responses.
    async fn get_batch(&self, batch_id: &str) -> Result<Option<SuggestionBatch>, GrocerError>;

    /// Claims the response slot for `index` if it is still free.
    ///
    /// Returns `false` when a response was already recorded for that index.
    async fn record_batch_response(
        &self,
        batch_id: &str,
        index: usize,
        response: &BatchResponse,
    ) -> Result<bool, GrocerError>;

    /// Frees a slot claimed by [`record_batch_response`](Self::record_batch_response)
    /// whose side effects failed. Returns whether a claim existed.
    async fn release_batch_response(&self, batch_id: &str, index: usize)
    -> Result<bool, GrocerError>;

    /// Deletes batches created before `before`. Returns the number deleted.
    async fn purge_batches(&self, before: &str) -> Result<u64, GrocerError>;

    // --- Selection sessions ---

    async fn insert_session(&self, session: &SelectionSession) -> Result<(), GrocerError>;

    /// Loads a session, validating its invariants.
    async fn get_session(
        &self,
        kind: SessionKind,
        session_id: &str,
    ) -> Result<Option<SelectionSession>, GrocerError>;

    /// Writes `session` if the stored version still equals `session.version`.
    ///
    /// On success the stored version becomes `session.version + 1`. Returns
    /// `false` if the row is gone or was changed in the meantime.
    async fn update_session(&self, session: &SelectionSession) -> Result<bool, GrocerError>;

    /// Deletes a session. Returns whether it existed.
    async fn delete_session(&self, kind: SessionKind, session_id: &str)
    -> Result<bool, GrocerError>;

    /// Deletes sessions of both kinds last updated before `before`.
    async fn purge_sessions(&self, before: &str) -> Result<u64, GrocerError>;
}
