// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accept/reject counters and the append-only feedback history.

use grocer_core::GrocerError;
use grocer_core::types::{ChatId, FeedbackEvent, ItemStats};
use rusqlite::params;

use crate::database::{Database, NOW_SQL};

/// Add one accept or one reject to the (chat, name) counters.
///
/// A missing row is created with zero counts first; the whole thing is a
/// single statement, so concurrent increments never lose an update.
pub async fn increment_stats(
    db: &Database,
    chat_id: ChatId,
    name: &str,
    display_name: &str,
    accepted: bool,
) -> Result<(), GrocerError> {
    let name = name.to_string();
    let display_name = display_name.to_string();
    let (accepts, rejects) = if accepted { (1i64, 0i64) } else { (0, 1) };
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO item_stats
                         (chat_id, name, display_name, accepts, rejects, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, {NOW_SQL}, {NOW_SQL})
                     ON CONFLICT (chat_id, name) DO UPDATE SET
                         accepts = accepts + excluded.accepts,
                         rejects = rejects + excluded.rejects,
                         display_name = excluded.display_name,
                         updated_at = excluded.updated_at"
                ),
                params![chat_id, name, display_name, accepts, rejects],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All stats rows for the chat ordered by name.
pub async fn get_stats(db: &Database, chat_id: ChatId) -> Result<Vec<ItemStats>, GrocerError> {
    db.connection()
        .call(move |conn| -> Result<Vec<ItemStats>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, name, display_name, accepts, rejects, created_at, updated_at
                 FROM item_stats WHERE chat_id = ?1 ORDER BY name ASC",
            )?;
            let rows = stmt.query_map(params![chat_id], |row| {
                Ok(ItemStats {
                    chat_id: row.get(0)?,
                    name: row.get(1)?,
                    display_name: row.get(2)?,
                    accepts: row.get(3)?,
                    rejects: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Append one event to the history.
pub async fn append_feedback(db: &Database, event: &FeedbackEvent) -> Result<(), GrocerError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO feedback_history (chat_id, name, display_name, accepted, at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.chat_id,
                    event.name,
                    event.display_name,
                    event.accepted,
                    event.at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The chat's history in insertion order.
pub async fn list_feedback(
    db: &Database,
    chat_id: ChatId,
) -> Result<Vec<FeedbackEvent>, GrocerError> {
    db.connection()
        .call(move |conn| -> Result<Vec<FeedbackEvent>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, name, display_name, accepted, at
                 FROM feedback_history WHERE chat_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![chat_id], |row| {
                Ok(FeedbackEvent {
                    chat_id: row.get(0)?,
                    name: row.get(1)?,
                    display_name: row.get(2)?,
                    accepted: row.get(3)?,
                    at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
