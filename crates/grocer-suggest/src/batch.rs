// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion batches: persisted button sets with one answer per entry.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use grocer_core::types::{
    BatchResponse, ChatId, ItemRef, SuggestionAction, SuggestionBatch, now_timestamp,
};
use grocer_core::{Button, CallbackToken, GrocerError, Keyboard, StorageAdapter};

use crate::feedback::record_feedback;

/// Message text above the suggestion keyboard.
pub const SUGGESTIONS_HEADER: &str = "Weekly suggestions:";

/// Result of answering one suggestion button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespondOutcome {
    /// This press was the first for the entry; side effects were applied.
    Recorded {
        item: ItemRef,
        action: SuggestionAction,
    },
    /// The entry was answered before; nothing changed.
    AlreadyRecorded,
}

impl RespondOutcome {
    /// Confirmation shown in the chat for a recorded answer.
    pub fn reply_text(&self) -> Option<String> {
        match self {
            RespondOutcome::Recorded {
                item,
                action: SuggestionAction::Accept,
            } => Some(format!("Added {}.", item.display_name)),
            RespondOutcome::Recorded {
                item,
                action: SuggestionAction::Skip,
            } => Some(format!("Skipped {}.", item.display_name)),
            RespondOutcome::AlreadyRecorded => None,
        }
    }
}

/// Persists a new batch for `items` and returns it.
pub async fn create_batch(
    storage: &dyn StorageAdapter,
    chat_id: ChatId,
    items: Vec<ItemRef>,
) -> Result<SuggestionBatch, GrocerError> {
    let batch = SuggestionBatch {
        id: uuid::Uuid::new_v4().to_string(),
        chat_id,
        items,
        responses: BTreeMap::new(),
        created_at: now_timestamp(),
    };
    storage.insert_batch(&batch).await?;
    crate::recording::record_suggestions_sent(batch.items.len());
    info!(chat_id, batch_id = %batch.id, items = batch.items.len(), "suggestion batch created");
    Ok(batch)
}

/// Applies an accept or skip for entry `index` of a batch.
///
/// The response slot is claimed before any side effect, so of two presses
/// racing on the same entry exactly one changes the list and the counters.
/// If a side effect fails the claim is released and the press can be retried.
pub async fn respond(
    storage: &dyn StorageAdapter,
    batch_id: &str,
    index: usize,
    action: SuggestionAction,
) -> Result<RespondOutcome, GrocerError> {
    if uuid::Uuid::parse_str(batch_id).is_err() {
        return Err(GrocerError::InvalidSession(batch_id.to_string()));
    }
    let batch = storage.get_batch(batch_id).await?.ok_or(GrocerError::Expired)?;
    let item = batch
        .items
        .get(index)
        .cloned()
        .ok_or(GrocerError::InvalidIndex {
            index,
            len: batch.items.len(),
        })?;

    let response = BatchResponse {
        action,
        at: now_timestamp(),
    };
    if !storage
        .record_batch_response(batch_id, index, &response)
        .await?
    {
        debug!(batch_id, index, "suggestion already answered");
        return Ok(RespondOutcome::AlreadyRecorded);
    }

    if let Err(e) = apply_response(storage, batch.chat_id, &item, action).await {
        match storage.release_batch_response(batch_id, index).await {
            Ok(_) => debug!(batch_id, index, "suggestion claim released after failure"),
            Err(release) => warn!(batch_id, index, error = %release, "failed to release suggestion claim"),
        }
        return Err(e);
    }

    Ok(RespondOutcome::Recorded { item, action })
}

async fn apply_response(
    storage: &dyn StorageAdapter,
    chat_id: ChatId,
    item: &ItemRef,
    action: SuggestionAction,
) -> Result<(), GrocerError> {
    let accepted = action == SuggestionAction::Accept;
    if accepted {
        storage
            .upsert_item(chat_id, &item.name, &item.display_name)
            .await?;
    }
    record_feedback(storage, chat_id, &item.name, &item.display_name, accepted).await
}

/// One `Add {item}` / `Skip` row per batch entry.
pub fn suggestion_keyboard(batch: &SuggestionBatch) -> Keyboard {
    Keyboard::new(
        batch
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                vec![
                    Button::new(
                        format!("Add {}", item.display_name),
                        CallbackToken::suggestion(&batch.id, i, SuggestionAction::Accept),
                    ),
                    Button::new(
                        "Skip",
                        CallbackToken::suggestion(&batch.id, i, SuggestionAction::Skip),
                    ),
                ]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_test_utils::{FlakyStorage, temp_storage};

    fn refs(names: &[&str]) -> Vec<ItemRef> {
        names
            .iter()
            .map(|n| ItemRef {
                name: n.to_string(),
                display_name: n.to_uppercase(),
            })
            .collect()
    }

    #[tokio::test]
    async fn accept_adds_item_and_counts_once() {
        let (storage, _dir) = temp_storage().await.unwrap();
        let batch = create_batch(storage.as_ref(), 3, refs(&["milk", "eggs"]))
            .await
            .unwrap();

        let first = respond(storage.as_ref(), &batch.id, 0, SuggestionAction::Accept)
            .await
            .unwrap();
        assert_eq!(first.reply_text().as_deref(), Some("Added MILK."));

        // A second press, either button, changes nothing.
        for action in [SuggestionAction::Accept, SuggestionAction::Skip] {
            let again = respond(storage.as_ref(), &batch.id, 0, action).await.unwrap();
            assert_eq!(again, RespondOutcome::AlreadyRecorded);
        }

        let stats = storage.get_stats(3).await.unwrap();
        assert_eq!((stats[0].accepts, stats[0].rejects), (1, 0));
        assert_eq!(storage.list_feedback(3).await.unwrap().len(), 1);
        assert_eq!(storage.list_items(3).await.unwrap()[0].display_name, "MILK");
    }

    #[tokio::test]
    async fn skip_records_rejection_without_adding() {
        let (storage, _dir) = temp_storage().await.unwrap();
        let batch = create_batch(storage.as_ref(), 3, refs(&["milk", "eggs"]))
            .await
            .unwrap();

        let outcome = respond(storage.as_ref(), &batch.id, 1, SuggestionAction::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.reply_text().as_deref(), Some("Skipped EGGS."));
        assert!(storage.list_items(3).await.unwrap().is_empty());
        assert_eq!(storage.get_stats(3).await.unwrap()[0].rejects, 1);

        let stored = storage.get_batch(&batch.id).await.unwrap().unwrap();
        assert_eq!(stored.responses[&1].action, SuggestionAction::Skip);
    }

    #[tokio::test]
    async fn failed_accept_can_be_pressed_again() {
        let (inner, _dir) = temp_storage().await.unwrap();
        let storage = FlakyStorage::new(inner);
        let batch = create_batch(&storage, 3, refs(&["milk"])).await.unwrap();

        storage.fail_increment_stats(1);
        let err = respond(&storage, &batch.id, 0, SuggestionAction::Accept)
            .await
            .unwrap_err();
        assert!(matches!(err, GrocerError::Internal(_)));
        assert!(storage.get_batch(&batch.id).await.unwrap().unwrap().responses.is_empty());

        let retry = respond(&storage, &batch.id, 0, SuggestionAction::Accept)
            .await
            .unwrap();
        assert!(matches!(retry, RespondOutcome::Recorded { .. }));
        let stats = storage.get_stats(3).await.unwrap();
        assert_eq!((stats[0].accepts, stats[0].rejects), (1, 0));
        assert_eq!(storage.list_feedback(3).await.unwrap().len(), 1);
        assert_eq!(storage.list_items(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_presses_apply_once() {
        let (storage, _dir) = temp_storage().await.unwrap();
        let batch = create_batch(storage.as_ref(), 3, refs(&["milk"])).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let storage = storage.clone();
            let id = batch.id.clone();
            handles.push(tokio::spawn(async move {
                respond(storage.as_ref(), &id, 0, SuggestionAction::Accept).await
            }));
        }
        let mut recorded = 0;
        for handle in handles {
            if let RespondOutcome::Recorded { .. } = handle.await.unwrap().unwrap() {
                recorded += 1;
            }
        }
        assert_eq!(recorded, 1);
        assert_eq!(storage.get_stats(3).await.unwrap()[0].accepts, 1);
    }

    #[tokio::test]
    async fn bad_references_are_rejected() {
        let (storage, _dir) = temp_storage().await.unwrap();
        let batch = create_batch(storage.as_ref(), 3, refs(&["milk"])).await.unwrap();

        let err = respond(storage.as_ref(), "not-a-uuid", 0, SuggestionAction::Accept)
            .await
            .unwrap_err();
        assert!(matches!(err, GrocerError::InvalidSession(_)));

        let missing = uuid::Uuid::new_v4().to_string();
        let err = respond(storage.as_ref(), &missing, 0, SuggestionAction::Accept)
            .await
            .unwrap_err();
        assert!(matches!(err, GrocerError::Expired));

        let err = respond(storage.as_ref(), &batch.id, 1, SuggestionAction::Accept)
            .await
            .unwrap_err();
        assert!(matches!(err, GrocerError::InvalidIndex { index: 1, len: 1 }));
    }

    #[tokio::test]
    async fn keyboard_has_one_row_per_item() {
        let (storage, _dir) = temp_storage().await.unwrap();
        let batch = create_batch(storage.as_ref(), 3, refs(&["milk", "eggs"]))
            .await
            .unwrap();

        let keyboard = suggestion_keyboard(&batch);
        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.rows[1][0].label, "Add EGGS");
        assert_eq!(keyboard.rows[1][1].label, "Skip");
        assert_eq!(
            keyboard.rows[1][1].token.encode(),
            format!("r:{}:1", batch.id)
        );
    }
}
