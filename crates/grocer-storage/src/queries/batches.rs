// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion batches and their per-index responses.

use std::collections::BTreeMap;

use grocer_core::GrocerError;
use grocer_core::types::{BatchResponse, ItemRef, SuggestionAction, SuggestionBatch};
use rusqlite::params;

use crate::database::Database;
use crate::queries::optional;

pub async fn insert_batch(db: &Database, batch: &SuggestionBatch) -> Result<(), GrocerError> {
    let items = serde_json::to_string(&batch.items).map_err(GrocerError::storage)?;
    let id = batch.id.clone();
    let chat_id = batch.chat_id;
    let created_at = batch.created_at.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO suggestion_batches (id, chat_id, items, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, chat_id, items, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

struct BatchRow {
    chat_id: i64,
    items: String,
    created_at: String,
    responses: Vec<(i64, String, String)>,
}

/// Load a batch with every recorded response.
pub async fn get_batch(db: &Database, batch_id: &str) -> Result<Option<SuggestionBatch>, GrocerError> {
    let id = batch_id.to_string();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<BatchRow>, rusqlite::Error> {
            let head = optional(conn.query_row(
                "SELECT chat_id, items, created_at FROM suggestion_batches WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            ))?;
            let Some((chat_id, items, created_at)) = head else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT idx, action, at FROM batch_responses WHERE batch_id = ?1 ORDER BY idx",
            )?;
            let responses: Vec<(i64, String, String)> = stmt
                .query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(BatchRow {
                chat_id,
                items,
                created_at,
                responses,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items: Vec<ItemRef> = serde_json::from_str(&row.items).map_err(GrocerError::storage)?;
    let mut responses = BTreeMap::new();
    for (idx, action, at) in row.responses {
        let idx = usize::try_from(idx).map_err(GrocerError::storage)?;
        let action: SuggestionAction = action
            .parse()
            .map_err(|_| GrocerError::storage(format!("unknown batch action `{action}`")))?;
        responses.insert(idx, BatchResponse { action, at });
    }

    Ok(Some(SuggestionBatch {
        id: batch_id.to_string(),
        chat_id: row.chat_id,
        items,
        responses,
        created_at: row.created_at,
    }))
}

/// Claim the response slot for `index`. Returns `false` if it was taken.
pub async fn record_response(
    db: &Database,
    batch_id: &str,
    index: usize,
    response: &BatchResponse,
) -> Result<bool, GrocerError> {
    let id = batch_id.to_string();
    let idx = i64::try_from(index).map_err(GrocerError::storage)?;
    let action = response.action.to_string();
    let at = response.at.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(
                "INSERT OR IGNORE INTO batch_responses (batch_id, idx, action, at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, idx, action, at],
            )?;
            Ok(n == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Free a claimed slot again. Returns whether a claim existed.
pub async fn release_response(db: &Database, batch_id: &str, index: usize) -> Result<bool, GrocerError> {
    let id = batch_id.to_string();
    let idx = i64::try_from(index).map_err(GrocerError::storage)?;
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(
                "DELETE FROM batch_responses WHERE batch_id = ?1 AND idx = ?2",
                params![id, idx],
            )?;
            Ok(n == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete batches created before `before`; responses cascade.
pub async fn purge_batches(db: &Database, before: &str) -> Result<u64, GrocerError> {
    let before = before.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let n = conn.execute(
                "DELETE FROM suggestion_batches WHERE created_at < ?1",
                params![before],
            )?;
            Ok(n as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    fn batch(id: &str, created_at: &str) -> SuggestionBatch {
        SuggestionBatch {
            id: id.to_string(),
            chat_id: 9,
            items: vec![
                ItemRef {
                    name: "milk".to_string(),
                    display_name: "Milk".to_string(),
                },
                ItemRef {
                    name: "eggs".to_string(),
                    display_name: "eggs".to_string(),
                },
            ],
            responses: BTreeMap::new(),
            created_at: created_at.to_string(),
        }
    }

    fn response(action: SuggestionAction) -> BatchResponse {
        BatchResponse {
            action,
            at: "2026-03-02T09:00:01.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips_items() {
        let (db, _dir) = setup_db().await;
        let b = batch("b1", "2026-03-02T09:00:00.000Z");
        insert_batch(&db, &b).await.unwrap();

        let loaded = get_batch(&db, "b1").await.unwrap().unwrap();
        assert_eq!(loaded, b);
        assert!(get_batch(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_response_wins() {
        let (db, _dir) = setup_db().await;
        insert_batch(&db, &batch("b1", "2026-03-02T09:00:00.000Z"))
            .await
            .unwrap();

        assert!(
            record_response(&db, "b1", 0, &response(SuggestionAction::Accept))
                .await
                .unwrap()
        );
        assert!(
            !record_response(&db, "b1", 0, &response(SuggestionAction::Skip))
                .await
                .unwrap()
        );
        assert!(
            record_response(&db, "b1", 1, &response(SuggestionAction::Skip))
                .await
                .unwrap()
        );

        let loaded = get_batch(&db, "b1").await.unwrap().unwrap();
        assert_eq!(loaded.responses.len(), 2);
        assert_eq!(loaded.responses[&0].action, SuggestionAction::Accept);
        assert_eq!(loaded.responses[&1].action, SuggestionAction::Skip);
    }

    #[tokio::test]
    async fn released_slot_can_be_claimed_again() {
        let (db, _dir) = setup_db().await;
        insert_batch(&db, &batch("b1", "2026-03-02T09:00:00.000Z"))
            .await
            .unwrap();
        record_response(&db, "b1", 0, &response(SuggestionAction::Accept))
            .await
            .unwrap();

        assert!(release_response(&db, "b1", 0).await.unwrap());
        assert!(!release_response(&db, "b1", 0).await.unwrap());
        assert!(
            record_response(&db, "b1", 0, &response(SuggestionAction::Skip))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn response_for_missing_batch_is_an_error() {
        let (db, _dir) = setup_db().await;
        let result = record_response(&db, "nope", 0, &response(SuggestionAction::Accept)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn purge_removes_old_batches_and_their_responses() {
        let (db, _dir) = setup_db().await;
        insert_batch(&db, &batch("old", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        insert_batch(&db, &batch("new", "2026-03-01T00:00:00.000Z"))
            .await
            .unwrap();
        record_response(&db, "old", 0, &response(SuggestionAction::Accept))
            .await
            .unwrap();

        let purged = purge_batches(&db, "2026-02-01T00:00:00.000Z").await.unwrap();
        assert_eq!(purged, 1);
        assert!(get_batch(&db, "old").await.unwrap().is_none());
        assert!(get_batch(&db, "new").await.unwrap().is_some());

        let orphans: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM batch_responses", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
