// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grocery list items, keyed by (chat, normalized name).

use grocer_core::GrocerError;
use grocer_core::types::{ChatId, GroceryItem};
use rusqlite::params;

use crate::database::{Database, NOW_SQL};

/// Insert an item or refresh its display name.
pub async fn upsert_item(
    db: &Database,
    chat_id: ChatId,
    name: &str,
    display_name: &str,
) -> Result<(), GrocerError> {
    let name = name.to_string();
    let display_name = display_name.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO items (chat_id, name, display_name, created_at, updated_at)
                     VALUES (?1, ?2, ?3, {NOW_SQL}, {NOW_SQL})
                     ON CONFLICT (chat_id, name) DO UPDATE SET
                         display_name = excluded.display_name,
                         updated_at = excluded.updated_at"
                ),
                params![chat_id, name, display_name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The chat's list ordered by display name.
pub async fn list_items(db: &Database, chat_id: ChatId) -> Result<Vec<GroceryItem>, GrocerError> {
    db.connection()
        .call(move |conn| -> Result<Vec<GroceryItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, name, display_name, created_at, updated_at
                 FROM items WHERE chat_id = ?1
                 ORDER BY display_name ASC, name ASC",
            )?;
            let rows = stmt.query_map(params![chat_id], |row| {
                Ok(GroceryItem {
                    chat_id: row.get(0)?,
                    name: row.get(1)?,
                    display_name: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete one item. Returns whether a row was removed.
pub async fn delete_item(db: &Database, chat_id: ChatId, name: &str) -> Result<bool, GrocerError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(
                "DELETE FROM items WHERE chat_id = ?1 AND name = ?2",
                params![chat_id, name],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete every item whose name is in `names`, in one transaction.
pub async fn delete_items(
    db: &Database,
    chat_id: ChatId,
    names: &[String],
) -> Result<u64, GrocerError> {
    let names = names.to_vec();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut deleted = 0u64;
            {
                let mut stmt = tx.prepare("DELETE FROM items WHERE chat_id = ?1 AND name = ?2")?;
                for name in &names {
                    deleted += stmt.execute(params![chat_id, name])? as u64;
                }
            }
            tx.commit()?;
            Ok(deleted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete the chat's whole list.
pub async fn clear_items(db: &Database, chat_id: ChatId) -> Result<u64, GrocerError> {
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let n = conn.execute("DELETE FROM items WHERE chat_id = ?1", params![chat_id])?;
            Ok(n as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::setup_db;

    #[tokio::test]
    async fn upsert_keeps_one_row_per_name() {
        let (db, _dir) = setup_db().await;

        upsert_item(&db, 1, "milk", "milk").await.unwrap();
        upsert_item(&db, 1, "milk", "Milk").await.unwrap();
        upsert_item(&db, 2, "milk", "milk").await.unwrap();

        let items = list_items(&db, 1).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name, "Milk");
    }

    #[tokio::test]
    async fn list_is_sorted_by_display_name() {
        let (db, _dir) = setup_db().await;
        for name in ["eggs", "bread", "milk"] {
            upsert_item(&db, 1, name, name).await.unwrap();
        }
        let names: Vec<String> = list_items(&db, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["bread", "eggs", "milk"]);
    }

    #[tokio::test]
    async fn delete_variants_report_counts() {
        let (db, _dir) = setup_db().await;
        for name in ["a", "b", "c", "d"] {
            upsert_item(&db, 1, name, name).await.unwrap();
        }
        upsert_item(&db, 2, "a", "a").await.unwrap();

        assert!(delete_item(&db, 1, "a").await.unwrap());
        assert!(!delete_item(&db, 1, "a").await.unwrap());

        let names = vec!["b".to_string(), "c".to_string(), "zzz".to_string()];
        assert_eq!(delete_items(&db, 1, &names).await.unwrap(), 2);

        assert_eq!(clear_items(&db, 1).await.unwrap(), 1);
        assert!(list_items(&db, 1).await.unwrap().is_empty());
        assert_eq!(list_items(&db, 2).await.unwrap().len(), 1);
    }
}
