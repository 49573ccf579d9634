// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Grocer list bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for text messages and button presses, plain-text replies
//! with inline keyboards, and in-place keyboard edits.

pub mod handler;
pub mod keyboard;

use async_trait::async_trait;
use grocer_config::model::TelegramConfig;
use grocer_core::error::GrocerError;
use grocer_core::keyboard::Keyboard;
use grocer_core::traits::{ChannelAdapter, PluginAdapter};
use grocer_core::types::{AdapterType, HealthStatus, InboundEvent, MessageId, OutboundMessage};
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, GrocerError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            GrocerError::Config("telegram.bot_token is required to serve".into())
        })?;

        if token.trim().is_empty() {
            return Err(GrocerError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), GrocerError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        match handler::message_to_event(&msg) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => debug!(msg_id = msg.id.0, "ignoring non-text message"),
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        async move {
                            match handler::callback_to_event(&query) {
                                Some(event) => {
                                    if tx.send(event).await.is_err() {
                                        warn!("inbound channel closed, dropping button press");
                                    }
                                }
                                None => debug!("ignoring callback without data or message"),
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, GrocerError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| GrocerError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, GrocerError> {
        let request = self.bot.send_message(ChatId(msg.chat_id), &msg.text);
        let sent = match &msg.keyboard {
            Some(kb) => request.reply_markup(keyboard::to_markup(kb)).await,
            None => request.await,
        }
        .map_err(|e| channel_error("failed to send message", e))?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit_message(
        &self,
        chat_id: grocer_core::ChatId,
        message_id: &MessageId,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<(), GrocerError> {
        let msg_id = parse_message_id(message_id)?;
        let request = self.bot.edit_message_text(ChatId(chat_id), msg_id, text);
        let result = match &keyboard {
            Some(kb) => request.reply_markup(keyboard::to_markup(kb)).await,
            None => request.await,
        };

        match result {
            Ok(_) => Ok(()),
            // A double tap can re-render an identical picker.
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(channel_error("failed to edit message", e)),
        }
    }

    async fn delete_message(
        &self,
        chat_id: grocer_core::ChatId,
        message_id: &MessageId,
    ) -> Result<(), GrocerError> {
        let msg_id = parse_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat_id), msg_id)
            .await
            .map_err(|e| channel_error("failed to delete message", e))?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), GrocerError> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text).show_alert(show_alert);
        }
        request
            .await
            .map_err(|e| channel_error("failed to answer callback", e))?;
        Ok(())
    }
}

fn parse_message_id(message_id: &MessageId) -> Result<teloxide::types::MessageId, GrocerError> {
    message_id
        .0
        .parse::<i32>()
        .map(teloxide::types::MessageId)
        .map_err(|e| GrocerError::Channel {
            message: format!("invalid message_id: {e}"),
            source: None,
        })
}

fn channel_error(context: &str, e: teloxide::RequestError) -> GrocerError {
    GrocerError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(&config(None)).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new(&config(Some(" "))).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        assert!(TelegramChannel::new(&config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"))).is_ok());
    }

    #[test]
    fn message_ids_must_be_numeric() {
        assert_eq!(
            parse_message_id(&MessageId("42".into())).unwrap(),
            teloxide::types::MessageId(42)
        );
        assert!(parse_message_id(&MessageId("mock-msg-1".into())).is_err());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(&config(Some("test:token"))).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }
}
