// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection session CRUD with optimistic versioning.
//!
//! Each session kind has its own table. `selected` is stored as a JSON array
//! of indices; the entries themselves never change after insert.

use std::collections::BTreeSet;

use grocer_core::types::{ItemRef, SessionKind};
use grocer_core::{GrocerError, SelectionSession, SessionPayload};
use rusqlite::params;

use crate::database::Database;
use crate::queries::optional;

fn table(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Recipe => "recipe_sessions",
        SessionKind::Remove => "remove_sessions",
    }
}

fn encode_selected(selected: &BTreeSet<usize>) -> Result<String, GrocerError> {
    serde_json::to_string(selected).map_err(GrocerError::storage)
}

fn to_page(page: usize) -> Result<i64, GrocerError> {
    i64::try_from(page).map_err(GrocerError::storage)
}

pub async fn insert_session(db: &Database, session: &SelectionSession) -> Result<(), GrocerError> {
    let selected = encode_selected(&session.selected)?;
    let page = to_page(session.page)?;
    let s = session.clone();

    match &session.payload {
        SessionPayload::Recipe {
            url,
            title,
            ingredients,
        } => {
            let ingredients = serde_json::to_string(ingredients).map_err(GrocerError::storage)?;
            let (url, title) = (url.clone(), title.clone());
            db.connection()
                .call(move |conn| -> Result<(), rusqlite::Error> {
                    conn.execute(
                        "INSERT INTO recipe_sessions
                             (id, chat_id, url, title, ingredients, selected, page, version,
                              created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                        params![
                            s.id,
                            s.chat_id,
                            url,
                            title,
                            ingredients,
                            selected,
                            page,
                            s.version,
                            s.created_at,
                            s.updated_at
                        ],
                    )?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)
        }
        SessionPayload::Remove { items } => {
            let items = serde_json::to_string(items).map_err(GrocerError::storage)?;
            db.connection()
                .call(move |conn| -> Result<(), rusqlite::Error> {
                    conn.execute(
                        "INSERT INTO remove_sessions
                             (id, chat_id, items, selected, page, version, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            s.id,
                            s.chat_id,
                            items,
                            selected,
                            page,
                            s.version,
                            s.created_at,
                            s.updated_at
                        ],
                    )?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)
        }
    }
}

/// Raw column values; JSON is decoded off the database thread.
struct SessionRow {
    chat_id: i64,
    /// `(url, title)` for recipe sessions.
    recipe: Option<(String, String)>,
    entries: String,
    selected: String,
    page: i64,
    version: i64,
    created_at: String,
    updated_at: String,
}

/// Load a session and check its invariants.
pub async fn get_session(
    db: &Database,
    kind: SessionKind,
    session_id: &str,
) -> Result<Option<SelectionSession>, GrocerError> {
    let id = session_id.to_string();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<SessionRow>, rusqlite::Error> {
            match kind {
                SessionKind::Recipe => optional(conn.query_row(
                    "SELECT chat_id, url, title, ingredients, selected, page, version,
                            created_at, updated_at
                     FROM recipe_sessions WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(SessionRow {
                            chat_id: row.get(0)?,
                            recipe: Some((row.get(1)?, row.get(2)?)),
                            entries: row.get(3)?,
                            selected: row.get(4)?,
                            page: row.get(5)?,
                            version: row.get(6)?,
                            created_at: row.get(7)?,
                            updated_at: row.get(8)?,
                        })
                    },
                )),
                SessionKind::Remove => optional(conn.query_row(
                    "SELECT chat_id, items, selected, page, version, created_at, updated_at
                     FROM remove_sessions WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(SessionRow {
                            chat_id: row.get(0)?,
                            recipe: None,
                            entries: row.get(1)?,
                            selected: row.get(2)?,
                            page: row.get(3)?,
                            version: row.get(4)?,
                            created_at: row.get(5)?,
                            updated_at: row.get(6)?,
                        })
                    },
                )),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    let Some(row) = row else {
        return Ok(None);
    };

    let payload = match row.recipe {
        Some((url, title)) => SessionPayload::Recipe {
            url,
            title,
            ingredients: serde_json::from_str::<Vec<String>>(&row.entries)
                .map_err(GrocerError::storage)?,
        },
        None => SessionPayload::Remove {
            items: serde_json::from_str::<Vec<ItemRef>>(&row.entries)
                .map_err(GrocerError::storage)?,
        },
    };

    let session = SelectionSession {
        id: session_id.to_string(),
        chat_id: row.chat_id,
        payload,
        selected: serde_json::from_str(&row.selected).map_err(GrocerError::storage)?,
        page: usize::try_from(row.page).map_err(GrocerError::storage)?,
        version: row.version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    session.validate()?;
    Ok(Some(session))
}

/// Compare-and-swap write of `selected` and `page`.
///
/// Succeeds only if the stored version still equals `session.version`, and
/// bumps it by one. Returns `false` on a lost race or a deleted row.
pub async fn update_session(db: &Database, session: &SelectionSession) -> Result<bool, GrocerError> {
    let selected = encode_selected(&session.selected)?;
    let page = to_page(session.page)?;
    let sql = format!(
        "UPDATE {} SET selected = ?1, page = ?2, version = version + 1, updated_at = ?3
         WHERE id = ?4 AND version = ?5",
        table(session.kind())
    );
    let id = session.id.clone();
    let version = session.version;
    let updated_at = session.updated_at.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(&sql, params![selected, page, updated_at, id, version])?;
            Ok(n == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a session. Returns whether it existed.
pub async fn delete_session(
    db: &Database,
    kind: SessionKind,
    session_id: &str,
) -> Result<bool, GrocerError> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table(kind));
    let id = session_id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            Ok(conn.execute(&sql, params![id])? > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete sessions of both kinds not touched since `before`.
pub async fn purge_sessions(db: &Database, before: &str) -> Result<u64, GrocerError> {
    let before = before.to_string();
    db.connection()
        .call(move |conn| -> Result<u64, rusqlite::Error> {
            let tx = conn.transaction()?;
            let recipes = tx.execute(
                "DELETE FROM recipe_sessions WHERE updated_at < ?1",
                params![before],
            )?;
            let removes = tx.execute(
                "DELETE FROM remove_sessions WHERE updated_at < ?1",
                params![before],
            )?;
            tx.commit()?;
            Ok((recipes + removes) as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
