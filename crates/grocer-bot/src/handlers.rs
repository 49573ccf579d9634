// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event handling: chat commands and button presses.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use grocer_config::model::BotConfig;
use grocer_core::normalize::{normalize, split_multi};
use grocer_core::types::{ChatId, ChatInfo, InboundEvent, MessageId, OutboundMessage, SessionKind};
use grocer_core::{
    CallbackToken, ChannelAdapter, CompletionAdapter, GrocerError, Keyboard, PickerOp,
    RecipeSource, StorageAdapter,
};
use grocer_session::{PickerOutcome, SessionManager};
use grocer_suggest::{
    RespondOutcome, SUGGESTIONS_HEADER, SuggestionRanker, create_batch, record_feedback, respond,
    suggestion_keyboard,
};

use crate::command::{Command, parse_command};
use crate::replies::{self, CallbackScope, FailureReply, callback_failure};

/// Bot behavior knobs taken from `[bot]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    pub suggestion_count: usize,
    /// Only this chat is served when set.
    pub admin_chat_id: Option<ChatId>,
}

impl BotSettings {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            suggestion_count: config.suggestion_count,
            admin_chat_id: config.admin_chat_id,
        }
    }
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::from_config(&BotConfig::default())
    }
}

/// Outcome of sending suggestions to one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionDelivery {
    /// A batch of this many entries was sent.
    Sent(usize),
    /// Nothing to suggest; the "no suggestions yet" note was sent.
    Empty,
}

/// The conversational bot: owns every collaborator a handler needs.
pub struct GrocerBot {
    storage: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    recipes: Arc<dyn RecipeSource>,
    completion: Option<Arc<dyn CompletionAdapter>>,
    ranker: SuggestionRanker,
    sessions: SessionManager,
    settings: BotSettings,
}

impl GrocerBot {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        recipes: Arc<dyn RecipeSource>,
        completion: Option<Arc<dyn CompletionAdapter>>,
        settings: BotSettings,
    ) -> Self {
        Self {
            ranker: SuggestionRanker::new(storage.clone(), completion.clone()),
            sessions: SessionManager::new(storage.clone()),
            storage,
            channel,
            recipes,
            completion,
            settings,
        }
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    pub fn channel(&self) -> &Arc<dyn ChannelAdapter> {
        &self.channel
    }

    fn is_authorized(&self, chat_id: ChatId) -> bool {
        self.settings.admin_chat_id.is_none_or(|admin| admin == chat_id)
    }

    /// Handles one inbound event.
    ///
    /// Button presses never fail: every error is turned into an answer to
    /// the press. Errors from commands are returned for the caller to log.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), GrocerError> {
        match event {
            InboundEvent::Text { chat, text } => self.handle_text(chat, &text).await,
            InboundEvent::Callback {
                chat,
                callback_id,
                message_id,
                data,
            } => {
                self.handle_callback(chat.chat_id, &callback_id, message_id.as_ref(), &data)
                    .await;
                Ok(())
            }
        }
    }

    async fn handle_text(&self, chat: ChatInfo, text: &str) -> Result<(), GrocerError> {
        let Some(command) = parse_command(text) else {
            debug!(chat_id = chat.chat_id, "ignoring plain text message");
            return Ok(());
        };
        let chat_id = chat.chat_id;
        if !self.is_authorized(chat_id) {
            warn!(chat_id, command = command.name(), "refusing command from unauthorized chat");
            return self.reply(chat_id, replies::RESTRICTED).await;
        }

        debug!(chat_id, command = command.name(), "handling command");
        metrics::counter!("grocer_commands_total", "command" => command.name()).increment(1);

        match command {
            Command::Start => {
                self.storage.upsert_chat(&chat).await?;
                info!(chat_id, "chat registered");
                self.reply(chat_id, replies::START).await
            }
            Command::Add(args) => self.add_items(chat_id, &args).await,
            Command::List => self.list(chat_id).await,
            Command::Remove(args) => {
                let args = args.trim();
                if args.is_empty() {
                    self.open_remove_picker(chat_id).await
                } else {
                    self.remove_one(chat_id, args, false).await
                }
            }
            Command::RemoveAll(args) => {
                let args = args.trim();
                if args.is_empty() {
                    self.reply(chat_id, replies::REMOVEALL_USAGE).await
                } else {
                    self.remove_one(chat_id, args, true).await
                }
            }
            Command::Clear => {
                let removed = self.storage.clear_items(chat_id).await?;
                debug!(chat_id, removed, "list cleared");
                self.reply(chat_id, replies::CLEARED).await
            }
            Command::Suggest => self.send_suggestions(chat_id).await.map(|_| ()),
            Command::Recipe(url) => self.import_recipe(chat_id, url.trim()).await,
            Command::Help => self.reply(chat_id, replies::HELP).await,
            Command::Unknown(name) => {
                debug!(chat_id, name = %name, "unknown command");
                self.reply(chat_id, replies::UNKNOWN_COMMAND).await
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, text: &str) -> Result<(), GrocerError> {
        self.channel
            .send(OutboundMessage::text(chat_id, text))
            .await
            .map(|_| ())
    }

    async fn reply_with_keyboard(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Keyboard,
    ) -> Result<MessageId, GrocerError> {
        self.channel
            .send(OutboundMessage {
                chat_id,
                text,
                keyboard: Some(keyboard),
            })
            .await
    }

    async fn add_items(&self, chat_id: ChatId, args: &str) -> Result<(), GrocerError> {
        let mut added = Vec::new();
        for display in split_multi(args) {
            let name = normalize(&display);
            if name.is_empty() {
                continue;
            }
            self.storage.upsert_item(chat_id, &name, &display).await?;
            record_feedback(self.storage.as_ref(), chat_id, &name, &display, true).await?;
            added.push(display);
        }

        if added.is_empty() {
            return self.reply(chat_id, replies::ADD_USAGE).await;
        }
        info!(chat_id, count = added.len(), "items added");
        self.reply(chat_id, &format!("Added {}.", added.join(", ")))
            .await
    }

    async fn list(&self, chat_id: ChatId) -> Result<(), GrocerError> {
        let items = self.storage.list_items(chat_id).await?;
        let text = replies::format_list(items.iter().map(|i| i.display_name.as_str()));
        self.reply(chat_id, text.as_deref().unwrap_or(replies::LIST_EMPTY))
            .await
    }

    async fn remove_one(&self, chat_id: ChatId, display: &str, all: bool) -> Result<(), GrocerError> {
        match self.delete_named(chat_id, display).await {
            Ok(()) => {}
            Err(GrocerError::NotFound(name)) => {
                debug!(chat_id, %name, "nothing to remove");
                return self.reply(chat_id, replies::ITEM_NOT_FOUND).await;
            }
            Err(e) => return Err(e),
        }
        let text = if all {
            format!("Removed all of {display}.")
        } else {
            format!("Removed {display}.")
        };
        self.reply(chat_id, &text).await
    }

    async fn delete_named(&self, chat_id: ChatId, display: &str) -> Result<(), GrocerError> {
        let name = normalize(display);
        if self.storage.delete_item(chat_id, &name).await? {
            Ok(())
        } else {
            Err(GrocerError::NotFound(name))
        }
    }

    async fn open_remove_picker(&self, chat_id: ChatId) -> Result<(), GrocerError> {
        let Some(session) = self.sessions.open_remove(chat_id).await? else {
            return self.reply(chat_id, replies::LIST_EMPTY).await;
        };
        let rendered = grocer_session::render(&session);
        let text = grocer_session::header(&session, &rendered);
        self.reply_with_keyboard(chat_id, text, rendered.keyboard)
            .await
            .map(|_| ())
    }

    async fn import_recipe(&self, chat_id: ChatId, url: &str) -> Result<(), GrocerError> {
        if url.is_empty() {
            return self.reply(chat_id, replies::RECIPE_USAGE).await;
        }

        let page = match self.recipes.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(chat_id, url, error = %e, "recipe fetch failed");
                return self.reply(chat_id, replies::RECIPE_UNREADABLE).await;
            }
        };
        if page.ingredients.is_empty() {
            return self.reply(chat_id, replies::RECIPE_NO_INGREDIENTS).await;
        }

        let mut ingredients = page.ingredients;
        if let Some(completion) = &self.completion
            && let Some(cleaned) =
                grocer_recipe::clean_ingredients(completion.as_ref(), &page.title, &ingredients)
                    .await
        {
            ingredients = cleaned;
        }

        let session = self
            .sessions
            .open_recipe(chat_id, url, &page.title, ingredients)
            .await?;
        let rendered = grocer_session::render(&session);
        let text = grocer_session::header(&session, &rendered);
        self.reply_with_keyboard(chat_id, text, rendered.keyboard)
            .await
            .map(|_| ())
    }

    /// Builds a batch for `chat_id` and sends it, or the "nothing yet" note.
    pub async fn send_suggestions(&self, chat_id: ChatId) -> Result<SuggestionDelivery, GrocerError> {
        let current = self.storage.list_items(chat_id).await?;
        let items = self
            .ranker
            .build_suggestions(chat_id, &current, self.settings.suggestion_count)
            .await?;
        if items.is_empty() {
            self.reply(chat_id, replies::NO_SUGGESTIONS).await?;
            return Ok(SuggestionDelivery::Empty);
        }

        let batch = create_batch(self.storage.as_ref(), chat_id, items).await?;
        let count = batch.items.len();
        self.reply_with_keyboard(chat_id, SUGGESTIONS_HEADER.to_string(), suggestion_keyboard(&batch))
            .await?;
        Ok(SuggestionDelivery::Sent(count))
    }

    // --- Button presses ---

    async fn handle_callback(
        &self,
        chat_id: ChatId,
        callback_id: &str,
        message_id: Option<&MessageId>,
        data: &str,
    ) {
        if !self.is_authorized(chat_id) {
            warn!(chat_id, "refusing button press from unauthorized chat");
            self.answer(callback_id, Some(replies::NOT_AUTHORIZED), true).await;
            return;
        }

        let token = match data.parse::<CallbackToken>() {
            Ok(token) => token,
            Err(e) => {
                debug!(chat_id, error = %e, "unreadable callback token");
                self.report_failure(chat_id, callback_id, CallbackScope::Unparsed, &e)
                    .await;
                return;
            }
        };

        match token {
            CallbackToken::Suggestion {
                batch_id,
                index,
                action,
            } => {
                match respond(self.storage.as_ref(), &batch_id, index, action).await {
                    Ok(outcome @ RespondOutcome::Recorded { .. }) => {
                        self.answer(callback_id, None, false).await;
                        if let Some(text) = outcome.reply_text()
                            && let Err(e) = self.reply(chat_id, &text).await
                        {
                            error!(chat_id, error = %e, "failed to confirm suggestion answer");
                        }
                    }
                    Ok(RespondOutcome::AlreadyRecorded) => {
                        self.answer(callback_id, Some(replies::ALREADY_RECORDED), false)
                            .await;
                    }
                    Err(e) => {
                        self.report_failure(chat_id, callback_id, CallbackScope::Suggestion, &e)
                            .await;
                    }
                }
            }
            CallbackToken::Picker {
                kind,
                session_id,
                op,
            } => {
                self.handle_picker(chat_id, callback_id, message_id, kind, &session_id, op)
                    .await;
            }
        }
    }

    async fn handle_picker(
        &self,
        chat_id: ChatId,
        callback_id: &str,
        message_id: Option<&MessageId>,
        kind: SessionKind,
        session_id: &str,
        op: PickerOp,
    ) {
        let outcome = match self.sessions.apply(kind, session_id, op).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_failure(chat_id, callback_id, CallbackScope::Picker(kind), &e)
                    .await;
                return;
            }
        };
        self.answer(callback_id, None, false).await;

        let result = match outcome {
            PickerOutcome::Updated(session) => {
                let rendered = grocer_session::render(&session);
                let text = grocer_session::header(&session, &rendered);
                match message_id {
                    Some(message_id) => {
                        self.channel
                            .edit_message(chat_id, message_id, &text, Some(rendered.keyboard))
                            .await
                    }
                    None => self
                        .reply_with_keyboard(chat_id, text, rendered.keyboard)
                        .await
                        .map(|_| ()),
                }
            }
            PickerOutcome::Finalized(report) => {
                if let Some(message_id) = message_id
                    && let Err(e) = self.channel.delete_message(chat_id, message_id).await
                {
                    warn!(chat_id, error = %e, "failed to delete finalized picker");
                }
                self.reply(chat_id, report.reply_text()).await
            }
        };
        if let Err(e) = result {
            error!(chat_id, session_id, %kind, error = %e, "failed to update picker message");
        }
    }

    async fn report_failure(
        &self,
        chat_id: ChatId,
        callback_id: &str,
        scope: CallbackScope,
        err: &GrocerError,
    ) {
        match callback_failure(scope, err) {
            FailureReply::Alert(text) => {
                if err.is_unexpected() {
                    error!(chat_id, error = %err, "button press failed");
                } else {
                    debug!(chat_id, error = %err, "button press rejected");
                }
                self.answer(callback_id, Some(text), true).await;
            }
            FailureReply::Message(text) => {
                self.answer(callback_id, None, false).await;
                if let Err(e) = self.reply(chat_id, text).await {
                    error!(chat_id, error = %e, "failed to send picker notice");
                }
            }
        }
    }

    async fn answer(&self, callback_id: &str, text: Option<&str>, show_alert: bool) {
        if let Err(e) = self
            .channel
            .answer_callback(callback_id, text, show_alert)
            .await
        {
            warn!(callback_id, error = %e, "failed to answer button press");
        }
    }
}
