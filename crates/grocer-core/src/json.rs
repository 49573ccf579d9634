// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient parsing of JSON embedded in text-model replies.
//!
//! Models often wrap JSON in a Markdown code fence or add a sentence around
//! it. These helpers cut out the JSON value before handing it to serde.

/// Removes a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Returns the outermost `open ... close` slice of `text`.
fn outermost(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

/// Parses a JSON array of strings out of a model reply.
///
/// Returns `None` if no array is present or any element is not a string.
/// Elements are trimmed and blank ones dropped.
pub fn parse_string_array(text: &str) -> Option<Vec<String>> {
    let body = outermost(strip_code_fence(text), '[', ']')?;
    let values: Vec<String> = serde_json::from_str(body).ok()?;
    Some(
        values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
    )
}

/// Parses a JSON object out of a model reply into `T`.
pub fn parse_object<T: serde::de::DeserializeOwned>(text: &str) -> Option<T> {
    let body = outermost(strip_code_fence(text), '{', '}')?;
    serde_json::from_str(body).ok()
}
