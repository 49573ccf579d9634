// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captures everything the bot does to the chat for assertions.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use grocer_core::keyboard::Keyboard;
use grocer_core::traits::adapter::PluginAdapter;
use grocer_core::traits::channel::ChannelAdapter;
use grocer_core::types::{
    AdapterType, ChatId, ChatInfo, HealthStatus, InboundEvent, MessageId, OutboundMessage,
};
use grocer_core::GrocerError;

/// An `edit_message` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// An `answer_callback` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAnswer {
    pub callback_id: String,
    pub text: Option<String>,
    pub show_alert: bool,
}

/// A mock messaging channel for testing.
///
/// Events injected via `inject()` are returned by `receive()`. Sends, edits,
/// deletes and callback answers are recorded in call order. Sends to chats
/// marked with `fail_sends_to()` return a channel error and are not recorded.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<(MessageId, OutboundMessage)>>>,
    edits: Arc<Mutex<Vec<Edit>>>,
    deleted: Arc<Mutex<Vec<MessageId>>>,
    answers: Arc<Mutex<Vec<CallbackAnswer>>>,
    unreachable: Arc<Mutex<HashSet<ChatId>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(Vec::new())),
            unreachable: Arc::new(Mutex::new(HashSet::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Make every later `send()` to `chat_id` fail, as if the bot was blocked.
    pub async fn fail_sends_to(&self, chat_id: ChatId) {
        self.unreachable.lock().await.insert(chat_id);
    }

    /// Queue an inbound event for `receive()`.
    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Queue a text message from `chat_id`.
    pub async fn inject_text(&self, chat_id: ChatId, text: &str) {
        self.inject(InboundEvent::Text {
            chat: ChatInfo::id(chat_id),
            text: text.to_string(),
        })
        .await;
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.iter().map(|(_, m)| m.clone()).collect()
    }

    /// Sent messages together with the ids handed back to the caller.
    pub async fn sent_with_ids(&self) -> Vec<(MessageId, OutboundMessage)> {
        self.sent.lock().await.clone()
    }

    /// Text of the most recent sent message.
    pub async fn last_text(&self) -> Option<String> {
        self.sent.lock().await.last().map(|(_, m)| m.text.clone())
    }

    pub async fn edits(&self) -> Vec<Edit> {
        self.edits.lock().await.clone()
    }

    pub async fn deleted(&self) -> Vec<MessageId> {
        self.deleted.lock().await.clone()
    }

    pub async fn answers(&self) -> Vec<CallbackAnswer> {
        self.answers.lock().await.clone()
    }

    /// Forget everything recorded so far.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
        self.edits.lock().await.clear();
        self.deleted.lock().await.clear();
        self.answers.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), GrocerError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, GrocerError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            self.notify.notified().await;
        }
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, GrocerError> {
        if self.unreachable.lock().await.contains(&msg.chat_id) {
            return Err(GrocerError::Channel {
                message: format!("chat {} is unreachable", msg.chat_id),
                source: None,
            });
        }
        let id = MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4()));
        self.sent.lock().await.push((id.clone(), msg));
        Ok(id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), GrocerError> {
        self.edits.lock().await.push(Edit {
            chat_id,
            message_id: message_id.clone(),
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        _chat_id: ChatId,
        message_id: &MessageId,
    ) -> Result<(), GrocerError> {
        self.deleted.lock().await.push(message_id.clone());
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), GrocerError> {
        self.answers.lock().await.push(CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }
}
