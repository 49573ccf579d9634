// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection session record and its state transitions.
//!
//! A session is a paginated multi-select over a fixed list of entries: the
//! ingredients of a recipe, or a snapshot of the chat's list taken when a
//! remove picker opened. Transitions here are pure; persistence and
//! finalization live in `grocer-session`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GrocerError;
use crate::types::{ChatId, ItemRef, SessionKind, now_timestamp};

/// Entries shown per picker page.
pub const PAGE_SIZE: usize = 8;

/// Number of pages needed for `item_count` entries. Never zero.
pub fn total_pages(item_count: usize) -> usize {
    item_count.div_ceil(PAGE_SIZE).max(1)
}

/// What a session selects from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionPayload {
    /// Ingredient lines of an imported recipe.
    Recipe {
        url: String,
        title: String,
        ingredients: Vec<String>,
    },
    /// Snapshot of the list at the time the picker opened.
    Remove { items: Vec<ItemRef> },
}

/// A persisted picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSession {
    pub id: String,
    pub chat_id: ChatId,
    pub payload: SessionPayload,
    pub selected: BTreeSet<usize>,
    pub page: usize,
    /// Bumped on every persisted mutation.
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl SelectionSession {
    fn new(chat_id: ChatId, payload: SessionPayload) -> Self {
        let now = now_timestamp();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id,
            payload,
            selected: BTreeSet::new(),
            page: 0,
            version: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// A recipe picker with nothing selected, on the first page.
    pub fn recipe(
        chat_id: ChatId,
        url: impl Into<String>,
        title: impl Into<String>,
        ingredients: Vec<String>,
    ) -> Self {
        Self::new(
            chat_id,
            SessionPayload::Recipe {
                url: url.into(),
                title: title.into(),
                ingredients,
            },
        )
    }

    /// A remove picker over a snapshot of the list.
    pub fn remove(chat_id: ChatId, items: Vec<ItemRef>) -> Self {
        Self::new(chat_id, SessionPayload::Remove { items })
    }

    pub fn kind(&self) -> SessionKind {
        match self.payload {
            SessionPayload::Recipe { .. } => SessionKind::Recipe,
            SessionPayload::Remove { .. } => SessionKind::Remove,
        }
    }

    /// Number of selectable entries.
    pub fn len(&self) -> usize {
        match &self.payload {
            SessionPayload::Recipe { ingredients, .. } => ingredients.len(),
            SessionPayload::Remove { items } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text shown for the entry at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        match &self.payload {
            SessionPayload::Recipe { ingredients, .. } => ingredients.get(index).map(String::as_str),
            SessionPayload::Remove { items } => items.get(index).map(|i| i.display_name.as_str()),
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.len())
    }

    /// Flips membership of `index` in the selection.
    pub fn toggle(&mut self, index: usize) -> Result<(), GrocerError> {
        let len = self.len();
        if index >= len {
            return Err(GrocerError::InvalidIndex { index, len });
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.len()).collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Moves to `requested`, clamped into `[0, total_pages - 1]`.
    pub fn paginate(&mut self, requested: usize) -> usize {
        self.page = requested.min(self.total_pages() - 1);
        self.page
    }

    /// Checks the record invariants. Called on every load.
    pub fn validate(&self) -> Result<(), GrocerError> {
        let len = self.len();
        if let Some(&index) = self.selected.iter().find(|&&i| i >= len) {
            return Err(GrocerError::InvalidIndex { index, len });
        }
        let total_pages = self.total_pages();
        if self.page >= total_pages {
            return Err(GrocerError::InvalidPage {
                page: self.page,
                total_pages,
            });
        }
        Ok(())
    }
}
