// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-model helpers for recipe pages.
//!
//! Both helpers are advisory: any transport error or unusable reply yields
//! `None` and the caller keeps what it already has.

use grocer_core::CompletionAdapter;
use grocer_core::json::{parse_object, parse_string_array};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::extract::RecipeData;

const CLEAN_MAX_TOKENS: u32 = 600;
const EXTRACT_MAX_TOKENS: u32 = 800;

const CLEAN_SYSTEM_PROMPT: &str = "You are a helpful cooking assistant. \
Your task is to normalize recipe ingredients for a grocery list. \
Return only a JSON array of ingredient strings. \
Rules: remove quantities and units, keep only the ingredient name, \
keep common descriptors when essential (e.g., 'soy sauce', 'rice noodles'), \
deduplicate similar items, and keep names short.";

const EXTRACT_SYSTEM_PROMPT: &str = "You are a precise recipe extractor. \
Given the text of a recipe page, extract ingredients and steps. \
Return only JSON with keys: title (string), ingredients (array of strings), steps (array of strings). \
Do not invent content. If a field is unknown, return an empty array/string.";

/// Asks the model to shorten raw ingredient lines into grocery names.
///
/// Returns `None` on failure or when the model returns nothing usable.
pub async fn clean_ingredients(
    completion: &dyn CompletionAdapter,
    title: &str,
    raw: &[String],
) -> Option<Vec<String>> {
    let payload = serde_json::json!({ "title": title, "ingredients": raw });
    let user = format!(
        "Normalize the following recipe ingredients for a grocery list. \
         Return JSON array only.\n{payload}"
    );

    let reply = match completion
        .complete(CLEAN_SYSTEM_PROMPT, &user, CLEAN_MAX_TOKENS)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "ingredient cleanup failed, keeping raw ingredients");
            return None;
        }
    };

    let cleaned: Vec<String> = parse_string_array(&reply)?
        .iter()
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    if cleaned.is_empty() {
        debug!("ingredient cleanup returned no items");
        return None;
    }
    Some(cleaned)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtractReply {
    title: Option<serde_json::Value>,
    ingredients: Option<serde_json::Value>,
    steps: Option<serde_json::Value>,
}

/// Asks the model to pull a recipe out of page text.
pub async fn extract_with_model(
    completion: &dyn CompletionAdapter,
    url: &str,
    text: &str,
) -> Option<RecipeData> {
    let payload = serde_json::json!({ "url": url, "text": text });
    let user = format!("Extract the recipe data from this page. Return JSON only.\n{payload}");

    let reply = match completion
        .complete(EXTRACT_SYSTEM_PROMPT, &user, EXTRACT_MAX_TOKENS)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(url, error = %e, "model recipe extraction failed");
            return None;
        }
    };

    let parsed: ExtractReply = parse_object(&reply)?;
    Some(RecipeData {
        title: parsed
            .title
            .as_ref()
            .and_then(|t| t.as_str())
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        ingredients: string_list(parsed.ingredients.as_ref()),
        steps: string_list(parsed.steps.as_ref()),
    })
}

/// Keeps the non-blank strings of a JSON array; anything else is empty.
fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
