// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording accept/reject decisions.

use tracing::debug;

use grocer_core::types::{ChatId, FeedbackEvent, now_timestamp};
use grocer_core::{GrocerError, StorageAdapter};

/// Bumps the (chat, name) counter and appends the decision to the history.
///
/// The counter update is atomic on its own; the history append is a second
/// write and is not rolled back if it fails.
pub async fn record_feedback(
    storage: &dyn StorageAdapter,
    chat_id: ChatId,
    name: &str,
    display_name: &str,
    accepted: bool,
) -> Result<(), GrocerError> {
    storage
        .increment_stats(chat_id, name, display_name, accepted)
        .await?;
    storage
        .append_feedback(&FeedbackEvent {
            chat_id,
            name: name.to_string(),
            display_name: display_name.to_string(),
            accepted,
            at: now_timestamp(),
        })
        .await?;
    crate::recording::record_feedback(accepted);
    debug!(chat_id, name, accepted, "feedback recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_test_utils::temp_storage;

    #[tokio::test]
    async fn updates_counters_and_history() {
        let (storage, _dir) = temp_storage().await.unwrap();

        record_feedback(storage.as_ref(), 2, "milk", "milk", true).await.unwrap();
        record_feedback(storage.as_ref(), 2, "milk", "Milk", false).await.unwrap();

        let stats = storage.get_stats(2).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!((stats[0].accepts, stats[0].rejects), (1, 1));
        assert_eq!(stats[0].display_name, "Milk");

        let history = storage.list_feedback(2).await.unwrap();
        let accepted: Vec<bool> = history.iter().map(|e| e.accepted).collect();
        assert_eq!(accepted, vec![true, false]);
    }
}
