// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Grocer crates.
//!
//! Every persisted entity is a plain record with explicit optional fields.
//! Timestamps are RFC 3339 UTC strings with millisecond precision, so they
//! sort lexically in chronological order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::keyboard::Keyboard;

/// Platform identifier of a chat (Telegram chat ids are signed 64-bit).
pub type ChatId = i64;

/// Unique identifier for a message delivered through a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Completion,
    Storage,
    RecipeSource,
}

/// Returns the current UTC time formatted the way all entities store it.
pub fn now_timestamp() -> String {
    format_timestamp(chrono::Utc::now())
}

/// Formats `at` the way all entities store timestamps.
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

// --- Stored entities ---

/// A chat that has talked to the bot (registered by `/start`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub chat_id: ChatId,
    pub title: Option<String>,
    pub username: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One item on one chat's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub chat_id: ChatId,
    /// Normalized key, unique per chat.
    pub name: String,
    pub display_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Learned accept/reject history for one (chat, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub chat_id: ChatId,
    pub name: String,
    pub display_name: String,
    pub accepts: u32,
    pub rejects: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Immutable audit record of one accept/skip decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub chat_id: ChatId,
    pub name: String,
    pub display_name: String,
    pub accepted: bool,
    pub at: String,
}

/// A `{name, display_name}` pair, used for suggestion items and list snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub name: String,
    pub display_name: String,
}

/// What the user did with one suggestion button.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionAction {
    Accept,
    Skip,
}

/// The single recorded response for one index of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub action: SuggestionAction,
    pub at: String,
}

/// One rendered set of suggestion buttons with per-index responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBatch {
    pub id: String,
    pub chat_id: ChatId,
    pub items: Vec<ItemRef>,
    /// Index into `items` -> the one response recorded for it.
    #[serde(default)]
    pub responses: BTreeMap<usize, BatchResponse>,
    pub created_at: String,
}

/// Which picker a selection session drives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum SessionKind {
    /// Trim a recipe's ingredient list before saving it.
    Recipe,
    /// Bulk-remove items from the list.
    Remove,
}

// --- Channel types ---

/// Chat metadata that arrives with every inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatInfo {
    pub chat_id: ChatId,
    pub title: Option<String>,
    pub username: Option<String>,
}

impl ChatInfo {
    /// Chat info carrying only an id.
    pub fn id(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            title: None,
            username: None,
        }
    }
}

/// An inbound event received from a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A text message (commands included).
    Text { chat: ChatInfo, text: String },
    /// A button press carrying an opaque callback token.
    Callback {
        chat: ChatInfo,
        callback_id: String,
        /// The message the pressed keyboard is attached to.
        message_id: Option<MessageId>,
        data: String,
    },
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    /// A plain text message without buttons.
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }
}

// --- Recipe types ---

/// A recipe as supplied by a [`RecipeSource`](crate::traits::RecipeSource).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub url: String,
    pub title: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}
