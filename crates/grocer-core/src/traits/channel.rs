// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat transports (Telegram).

use async_trait::async_trait;

use crate::error::GrocerError;
use crate::keyboard::Keyboard;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, InboundEvent, MessageId, OutboundMessage};

/// Adapter for a bidirectional chat transport.
///
/// The transport owns message delivery, inline keyboards and button presses;
/// the bot only sees [`InboundEvent`]s and sends [`OutboundMessage`]s.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), GrocerError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, GrocerError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, GrocerError>;

    /// Replaces the text and keyboard of a previously sent message.
    async fn edit_message(
        &self,
        chat_id: ChatId,
        message_id: &MessageId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), GrocerError>;

    /// Deletes a previously sent message.
    async fn delete_message(&self, chat_id: ChatId, message_id: &MessageId)
    -> Result<(), GrocerError>;

    /// Acknowledges a button press, optionally with a toast or alert.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), GrocerError>;
}
