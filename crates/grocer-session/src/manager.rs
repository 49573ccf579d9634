// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted picker sessions: open, mutate, finalize.
//!
//! Every mutation is a load-apply-store cycle guarded by the session's
//! `version`. A store that loses a race reloads and applies the operation
//! again, so two quick taps on different rows both land.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use grocer_core::normalize::{normalize, simplify_ingredient};
use grocer_core::selection::SessionPayload;
use grocer_core::types::{ChatId, ItemRef, SessionKind, now_timestamp};
use grocer_core::{GrocerError, PickerOp, SelectionSession, StorageAdapter};

/// Store attempts per mutation before giving up.
const MAX_ATTEMPTS: usize = 3;

/// What applying a picker operation did.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    /// The session changed (or a page moved) and should be re-rendered.
    Updated(SelectionSession),
    /// The session was applied to the list and deleted.
    Finalized(FinalizeReport),
}

/// Summary of a finalized session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeReport {
    pub kind: SessionKind,
    pub chat_id: ChatId,
    /// Entries added (recipe) or removed (remove).
    pub applied: usize,
}

impl FinalizeReport {
    pub fn reply_text(&self) -> &'static str {
        match self.kind {
            SessionKind::Recipe => "Selected ingredients added to your list.",
            SessionKind::Remove => "Selected items removed.",
        }
    }
}

/// Drives recipe and remove pickers against storage.
pub struct SessionManager {
    storage: Arc<dyn StorageAdapter>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Starts a recipe picker with nothing selected.
    pub async fn open_recipe(
        &self,
        chat_id: ChatId,
        url: &str,
        title: &str,
        ingredients: Vec<String>,
    ) -> Result<SelectionSession, GrocerError> {
        let session = SelectionSession::recipe(chat_id, url, title, ingredients);
        self.storage.insert_session(&session).await?;
        debug!(chat_id, session_id = %session.id, entries = session.len(), "recipe picker opened");
        Ok(session)
    }

    /// Starts a remove picker over a snapshot of the chat's list.
    ///
    /// Returns `None` when the list is empty.
    pub async fn open_remove(&self, chat_id: ChatId) -> Result<Option<SelectionSession>, GrocerError> {
        let items: Vec<ItemRef> = self
            .storage
            .list_items(chat_id)
            .await?
            .into_iter()
            .map(|i| ItemRef {
                name: i.name,
                display_name: i.display_name,
            })
            .collect();
        if items.is_empty() {
            return Ok(None);
        }
        let session = SelectionSession::remove(chat_id, items);
        self.storage.insert_session(&session).await?;
        debug!(chat_id, session_id = %session.id, entries = session.len(), "remove picker opened");
        Ok(Some(session))
    }

    /// Loads a session by reference.
    ///
    /// A reference that is not a session id at all is `InvalidSession`; a
    /// well-formed one with no row behind it is `Expired`.
    pub async fn load(&self, kind: SessionKind, session_id: &str) -> Result<SelectionSession, GrocerError> {
        if uuid::Uuid::parse_str(session_id).is_err() {
            return Err(GrocerError::InvalidSession(session_id.to_string()));
        }
        self.storage
            .get_session(kind, session_id)
            .await?
            .ok_or(GrocerError::Expired)
    }

    /// Applies one picker operation.
    pub async fn apply(
        &self,
        kind: SessionKind,
        session_id: &str,
        op: PickerOp,
    ) -> Result<PickerOutcome, GrocerError> {
        match op {
            PickerOp::Finalize => self.finalize(kind, session_id).await.map(PickerOutcome::Finalized),
            op => self.mutate(kind, session_id, op).await.map(PickerOutcome::Updated),
        }
    }

    async fn mutate(
        &self,
        kind: SessionKind,
        session_id: &str,
        op: PickerOp,
    ) -> Result<SelectionSession, GrocerError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut session = self.load(kind, session_id).await?;
            match op {
                PickerOp::Toggle(index) => session.toggle(index)?,
                PickerOp::Page(page) => {
                    session.paginate(page);
                }
                PickerOp::SelectAll => session.select_all(),
                PickerOp::ClearAll => session.clear_all(),
                PickerOp::Finalize => {
                    return Err(GrocerError::Internal("finalize is not a mutation".to_string()));
                }
            }
            session.updated_at = now_timestamp();

            if self.storage.update_session(&session).await? {
                session.version += 1;
                return Ok(session);
            }
            debug!(session_id, attempt, "session changed concurrently, retrying");
        }
        warn!(session_id, "session kept changing, giving up");
        Err(GrocerError::Internal(format!(
            "session {session_id} changed during {MAX_ATTEMPTS} attempts"
        )))
    }

    /// Applies the selection to the list and deletes the session.
    ///
    /// An empty selection is `NothingSelected` and keeps the session. The
    /// selection is first claimed with a version bump, so a toggle landing in
    /// between makes us reload. The list writes are idempotent and the row is
    /// deleted only after all of them succeed: a failed write leaves the
    /// session in place for a retry. Of two racing finalizes the one whose
    /// delete finds no row reports `Expired`.
    pub async fn finalize(&self, kind: SessionKind, session_id: &str) -> Result<FinalizeReport, GrocerError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut session = self.load(kind, session_id).await?;
            if session.selected.is_empty() {
                return Err(GrocerError::NothingSelected);
            }
            session.updated_at = now_timestamp();
            if !self.storage.update_session(&session).await? {
                debug!(session_id, attempt, "session changed before finalize, retrying");
                continue;
            }

            let applied = self.apply_selection(&session).await?;
            if !self.storage.delete_session(kind, session_id).await? {
                return Err(GrocerError::Expired);
            }

            metrics::counter!("grocer_sessions_finalized_total", "kind" => kind.to_string())
                .increment(1);
            info!(chat_id = session.chat_id, session_id, %kind, applied, "picker finalized");
            return Ok(FinalizeReport {
                kind,
                chat_id: session.chat_id,
                applied,
            });
        }
        warn!(session_id, "session kept changing, finalize gave up");
        Err(GrocerError::Internal(format!(
            "session {session_id} changed during {MAX_ATTEMPTS} finalize attempts"
        )))
    }

    /// Writes the selection to the list. Returns the number of distinct names.
    async fn apply_selection(&self, session: &SelectionSession) -> Result<usize, GrocerError> {
        let chat_id = session.chat_id;
        match &session.payload {
            SessionPayload::Recipe { ingredients, .. } => {
                let mut seen = BTreeSet::new();
                for raw in session.selected.iter().filter_map(|&i| ingredients.get(i)) {
                    let display = simplify_ingredient(raw);
                    let name = normalize(&display);
                    if name.is_empty() || !seen.insert(name.clone()) {
                        continue;
                    }
                    self.storage.upsert_item(chat_id, &name, &display).await?;
                }
                Ok(seen.len())
            }
            SessionPayload::Remove { items } => {
                let names: BTreeSet<String> = session
                    .selected
                    .iter()
                    .filter_map(|&i| items.get(i).map(|item| item.name.clone()))
                    .collect();
                let names: Vec<String> = names.into_iter().collect();
                let deleted = self.storage.delete_items(chat_id, &names).await?;
                debug!(chat_id, deleted, selected = names.len(), "remove picker applied");
                Ok(names.len())
            }
        }
    }
}
