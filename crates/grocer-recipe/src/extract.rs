// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe extraction from page markup.
//!
//! Most recipe sites embed a schema.org `Recipe` object as JSON-LD. The
//! object may sit at the top level, inside an array, or inside an `@graph`
//! container next to `WebPage`, `Organization` and friends.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JSON_LD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .unwrap()
});

static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Title used when a page names nothing.
pub const DEFAULT_TITLE: &str = "Recipe";

/// Fields pulled out of a recipe page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeData {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// Finds the first schema.org `Recipe` in the page's JSON-LD blocks.
///
/// Blocks that are not valid JSON are skipped.
pub fn extract_json_ld(html: &str) -> Option<RecipeData> {
    JSON_LD_PATTERN
        .captures_iter(html)
        .filter_map(|caps| serde_json::from_str::<Value>(caps[1].trim()).ok())
        .find_map(|value| find_recipe(&value).map(recipe_from_node))
}

/// Text of the page's `<title>`, if any.
pub fn html_title(html: &str) -> Option<String> {
    let caps = TITLE_PATTERN.captures(html)?;
    let title = collapse(&caps[1]);
    (!title.is_empty()).then_some(title)
}

/// Plain text rendering of `html`, cut to `max_chars` characters.
///
/// Bodies that do not look like markup (mirror readers return text) are only
/// truncated.
pub fn page_text(body: &str, max_chars: usize) -> String {
    let text = if body.trim_start().starts_with('<') {
        html2text::from_read(body.as_bytes(), 120).unwrap_or_else(|_| body.to_string())
    } else {
        body.to_string()
    };
    text.chars().take(max_chars).collect()
}

fn find_recipe(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(map) => {
            if map.get("@type").is_some_and(is_recipe_type) {
                return Some(value);
            }
            map.get("@graph").and_then(find_recipe)
        }
        _ => None,
    }
}

fn is_recipe_type(kind: &Value) -> bool {
    match kind {
        Value::String(s) => s == "Recipe",
        Value::Array(kinds) => kinds.iter().any(|k| k.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn recipe_from_node(node: &Value) -> RecipeData {
    let title = node
        .get("name")
        .and_then(Value::as_str)
        .map(collapse)
        .unwrap_or_default();

    let ingredients = match node.get("recipeIngredient") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(collapse)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(single)) => vec![collapse(single)],
        _ => Vec::new(),
    };

    let mut steps = Vec::new();
    if let Some(instructions) = node.get("recipeInstructions") {
        collect_steps(instructions, &mut steps);
    }

    RecipeData {
        title,
        ingredients,
        steps,
    }
}

/// Flattens `recipeInstructions`: a string, a list of strings, `HowToStep`
/// objects, or `HowToSection`s holding more of the same.
fn collect_steps(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            let step = collapse(s);
            if !step.is_empty() {
                out.push(step);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_steps(item, out)),
        Value::Object(map) => {
            if let Some(elements) = map.get("itemListElement") {
                collect_steps(elements, out);
            } else if let Some(text) = map.get("text") {
                collect_steps(text, out);
            }
        }
        _ => {}
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
