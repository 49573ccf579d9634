// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The slice of the Messages API wire format a single-turn completion needs.

use serde::{Deserialize, Serialize};

/// Body of one single-turn completion request.
#[derive(Debug, Serialize)]
pub struct CompletionBody<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "no_text")]
    pub system: &'a str,
    pub messages: [UserTurn<'a>; 1],
    pub max_tokens: u32,
    pub temperature: f32,
}

fn no_text(s: &&str) -> bool {
    s.is_empty()
}

/// The only turn we ever send: the user prompt.
#[derive(Debug, Serialize)]
pub struct UserTurn<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> UserTurn<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Successful reply. Non-text blocks are ignored.
#[derive(Debug, Deserialize)]
pub struct Reply {
    #[serde(default)]
    content: Vec<Block>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Text { text: String },
    #[serde(other)]
    Ignored,
}

impl Reply {
    /// Text blocks joined in order.
    pub fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|block| match block {
                Block::Text { text } => Some(text),
                Block::Ignored => None,
            })
            .collect()
    }
}

/// `{"error": {"type": .., "message": ..}}` returned with 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}
