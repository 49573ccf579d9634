// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of Telegram updates into channel-agnostic [`InboundEvent`]s.

use grocer_core::types::{ChatInfo, InboundEvent, MessageId};
use teloxide::types::{CallbackQuery, Chat, Message};

/// Chat metadata: group title, or the username of a private chat.
pub fn chat_info(chat: &Chat) -> ChatInfo {
    ChatInfo {
        chat_id: chat.id.0,
        title: chat.title().map(str::to_string),
        username: chat.username().map(str::to_string),
    }
}

/// Converts a text message. Other message types (stickers, photos) yield `None`.
pub fn message_to_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    Some(InboundEvent::Text {
        chat: chat_info(&msg.chat),
        text: text.to_string(),
    })
}

/// Converts a button press.
///
/// Presses without data, or whose message is no longer known to Telegram
/// at all, yield `None`.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.clone()?;
    let message = query.message.as_ref()?;
    Some(InboundEvent::Callback {
        chat: chat_info(message.chat()),
        callback_id: query.id.to_string(),
        message_id: Some(MessageId(message.id().0.to_string())),
        data,
    })
}
