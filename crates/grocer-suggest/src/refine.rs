// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model refinement of the local ranking.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use grocer_core::CompletionAdapter;
use grocer_core::json::parse_string_array;
use grocer_core::types::ItemRef;

use crate::ranker::Candidate;

/// Candidates offered to the model.
pub const POOL_SIZE: usize = 20;

const MAX_TOKENS: u32 = 400;

const SYSTEM_PROMPT: &str = "You are a conservative grocery assistant. \
Choose only items that are highly likely to be needed weekly. \
If unsure, return fewer items. \
Return only a JSON array of item names from the provided candidates.";

#[derive(Serialize)]
struct Request<'a> {
    limit: usize,
    candidates: &'a [Candidate],
}

/// Asks the model to pick from the top [`POOL_SIZE`] of `ranked`.
///
/// Returns `None` when the reply cannot be used, in which case the caller
/// keeps the local ranking. A usable reply is a non-empty JSON array of
/// names that overlaps the pool; the result keeps pool order.
pub async fn refine(
    completion: &dyn CompletionAdapter,
    ranked: &[Candidate],
    limit: usize,
) -> Option<Vec<ItemRef>> {
    let pool = &ranked[..ranked.len().min(POOL_SIZE)];
    let payload = serde_json::to_string(&Request {
        limit,
        candidates: pool,
    })
    .ok()?;
    let user = format!(
        "Select the most likely weekly items. \
         Return JSON array only, using candidate 'name' values.\n{payload}"
    );

    let reply = match completion.complete(SYSTEM_PROMPT, &user, MAX_TOKENS).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "suggestion refinement failed, using local ranking");
            crate::recording::record_refinement("error");
            return None;
        }
    };

    let Some(names) = parse_string_array(&reply) else {
        debug!(reply = %reply, "refinement reply is not a JSON array of strings");
        crate::recording::record_refinement("unparseable");
        return None;
    };
    let names: HashSet<String> = names.into_iter().collect();

    let picked: Vec<ItemRef> = pool
        .iter()
        .filter(|c| names.contains(&c.name))
        .take(limit)
        .map(Candidate::item_ref)
        .collect();

    if picked.is_empty() {
        debug!(returned = names.len(), "refinement picked nothing from the pool");
        crate::recording::record_refinement("empty");
        return None;
    }

    crate::recording::record_refinement("used");
    Some(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_test_utils::MockProvider;

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate {
                name: format!("item{i:02}"),
                display_name: format!("Item {i}"),
                accepts: 1,
                rejects: 0,
                score: 1.0 - i as f64 / 100.0,
            })
            .collect()
    }

    #[tokio::test]
    async fn only_the_top_of_the_ranking_is_offered() {
        let provider = MockProvider::with_responses(vec![r#"["item25", "item03"]"#.to_string()]);
        let picked = refine(&provider, &candidates(30), 5).await.unwrap();
        // item25 is outside the pool even though it is a real candidate.
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "item03");

        let user = &provider.calls().await[0].user;
        assert!(user.contains("item19"));
        assert!(!user.contains("item20"));
    }

    #[tokio::test]
    async fn fenced_reply_is_accepted_and_truncated() {
        let provider = MockProvider::with_responses(vec![
            "```json\n[\"item02\", \"item00\", \"item01\"]\n```".to_string(),
        ]);
        let picked = refine(&provider, &candidates(4), 2).await.unwrap();
        let names: Vec<&str> = picked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["item00", "item01"]);
        assert_eq!(picked[0].display_name, "Item 0");
    }

    #[tokio::test]
    async fn unusable_replies_yield_none() {
        for reply in ["", "nope", "[]", "[1, 2]", r#"["unknown"]"#] {
            let provider = MockProvider::with_responses(vec![reply.to_string()]);
            assert!(refine(&provider, &candidates(3), 2).await.is_none(), "reply {reply:?}");
        }
    }
}
