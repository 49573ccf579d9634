// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion ranking over a chat's feedback counters.
//!
//! Candidates are the items with feedback that are not on the list right
//! now, ordered by [`score`](crate::score::score). When a completion adapter
//! is configured, the top of that ranking is handed to the model for a
//! conservative pick; any failure there falls back to the local order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use grocer_core::types::{ChatId, GroceryItem, ItemRef, ItemStats};
use grocer_core::{CompletionAdapter, GrocerError, StorageAdapter};

use crate::refine;
use crate::score::score_stats;

/// A ranked item the chat has given feedback on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub display_name: String,
    pub accepts: u32,
    pub rejects: u32,
    pub score: f64,
}

impl Candidate {
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Scores `stats` and drops names in `current`.
///
/// The sort is stable, so equal scores keep the input order (storage returns
/// stats by name).
pub fn rank_candidates(stats: Vec<ItemStats>, current: &[GroceryItem]) -> Vec<Candidate> {
    let on_list: HashSet<&str> = current.iter().map(|i| i.name.as_str()).collect();
    let mut candidates: Vec<Candidate> = stats
        .into_iter()
        .filter(|s| !on_list.contains(s.name.as_str()))
        .map(|s| Candidate {
            score: score_stats(&s),
            name: s.name,
            display_name: s.display_name,
            accepts: s.accepts,
            rejects: s.rejects,
        })
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Builds suggestion lists for a chat.
pub struct SuggestionRanker {
    storage: Arc<dyn StorageAdapter>,
    completion: Option<Arc<dyn CompletionAdapter>>,
}

impl SuggestionRanker {
    /// `completion` enables model refinement; `None` ranks locally only.
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        completion: Option<Arc<dyn CompletionAdapter>>,
    ) -> Self {
        Self {
            storage,
            completion,
        }
    }

    /// Up to `limit` items the chat is likely to want, none already on the list.
    ///
    /// Only storage failures are errors; refinement never is.
    pub async fn build_suggestions(
        &self,
        chat_id: ChatId,
        current_items: &[GroceryItem],
        limit: usize,
    ) -> Result<Vec<ItemRef>, GrocerError> {
        let stats = self.storage.get_stats(chat_id).await?;
        let candidates = rank_candidates(stats, current_items);
        debug!(chat_id, candidates = candidates.len(), limit, "ranked suggestion candidates");

        if candidates.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        if let Some(completion) = &self.completion
            && let Some(picked) = refine::refine(completion.as_ref(), &candidates, limit).await
        {
            return Ok(picked);
        }

        Ok(candidates.iter().take(limit).map(Candidate::item_ref).collect())
    }
}
