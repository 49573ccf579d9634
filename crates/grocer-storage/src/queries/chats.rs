// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registered chats.

use grocer_core::GrocerError;
use grocer_core::types::{Chat, ChatInfo};
use rusqlite::params;

use crate::database::{Database, NOW_SQL};

/// Insert a chat or refresh its title and username.
pub async fn upsert_chat(db: &Database, chat: &ChatInfo) -> Result<(), GrocerError> {
    let chat = chat.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO chats (chat_id, title, username, created_at, updated_at)
                     VALUES (?1, ?2, ?3, {NOW_SQL}, {NOW_SQL})
                     ON CONFLICT (chat_id) DO UPDATE SET
                         title = excluded.title,
                         username = excluded.username,
                         updated_at = excluded.updated_at"
                ),
                params![chat.chat_id, chat.title, chat.username],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All chats, in registration order.
pub async fn list_chats(db: &Database) -> Result<Vec<Chat>, GrocerError> {
    db.connection()
        .call(|conn| -> Result<Vec<Chat>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT chat_id, title, username, created_at, updated_at
                 FROM chats ORDER BY created_at ASC, chat_id ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Chat {
                    chat_id: row.get(0)?,
                    title: row.get(1)?,
                    username: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
