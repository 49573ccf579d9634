// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `grocer serve` and `grocer suggest`.
//!
//! Both build the same adapter set: SQLite storage, the optional Anthropic
//! text model, the web recipe source and the Telegram channel. `serve`
//! connects the channel and runs the event loop next to the weekly
//! scheduler; `suggest` sends one round of suggestions and exits.

use std::sync::Arc;

use tracing::{info, warn};

use grocer_anthropic::AnthropicProvider;
use grocer_bot::shutdown::install_signal_handler;
use grocer_bot::{BotLoop, BotSettings, GrocerBot, SuggestionDelivery, WeeklyScheduler};
use grocer_config::model::GrocerConfig;
use grocer_core::{
    ChannelAdapter, CompletionAdapter, GrocerError, PluginAdapter, RecipeSource, StorageAdapter,
};
use grocer_recipe::WebRecipeSource;
use grocer_storage::SqliteStorage;
use grocer_telegram::TelegramChannel;

/// Runs the `grocer serve` command until SIGINT/SIGTERM.
pub async fn run_serve(config: GrocerConfig) -> Result<(), GrocerError> {
    init_tracing(&config.bot.log_level);
    grocer_bot::register_metrics();
    info!(name = config.bot.name.as_str(), "starting grocer serve");

    let storage = open_storage(&config).await?;
    let completion = completion_adapter(&config)?;

    let mut telegram = TelegramChannel::new(&config.telegram)?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let bot = Arc::new(build_bot(&config, storage.clone(), channel.clone(), completion)?);
    let cancel = install_signal_handler();

    let scheduler_handle = if config.schedule.enabled {
        let scheduler = WeeklyScheduler::new(bot.clone(), &config.schedule, &config.sessions)?;
        let scheduler_cancel = cancel.clone();
        Some(tokio::spawn(async move {
            scheduler.run(scheduler_cancel).await;
        }))
    } else {
        info!("weekly scheduler disabled");
        None
    };

    let result = BotLoop::new(bot).run(cancel.clone()).await;

    // The loop can also end because the channel closed.
    cancel.cancel();
    if let Some(handle) = scheduler_handle
        && let Err(e) = handle.await
    {
        warn!(error = %e, "scheduler task ended abnormally");
    }
    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    storage.close().await?;

    info!("grocer serve stopped");
    result
}

/// Runs the `grocer suggest` command: one round of suggestions, then exit.
pub async fn run_suggest(config: GrocerConfig, chat_id: Option<i64>) -> Result<(), GrocerError> {
    init_tracing(&config.bot.log_level);

    let storage = open_storage(&config).await?;
    let completion = completion_adapter(&config)?;
    // Sending needs no polling, so the channel is not connected.
    let channel: Arc<dyn ChannelAdapter> = Arc::new(TelegramChannel::new(&config.telegram)?);
    let bot = build_bot(&config, storage.clone(), channel, completion)?;

    let result = match chat_id {
        Some(chat_id) => bot.send_suggestions(chat_id).await.map(|delivery| match delivery {
            SuggestionDelivery::Sent(count) => println!("sent {count} suggestions to {chat_id}"),
            SuggestionDelivery::Empty => println!("no suggestions yet for {chat_id}"),
        }),
        None => bot.send_weekly_suggestions().await.map(|report| {
            println!(
                "chats: {}, sent: {}, empty: {}, failed: {}",
                report.chats, report.sent, report.empty, report.failed
            );
        }),
    };

    storage.close().await?;
    result
}

async fn open_storage(config: &GrocerConfig) -> Result<Arc<dyn StorageAdapter>, GrocerError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(Arc::new(storage))
}

/// The Anthropic adapter, or `None` when it is disabled or has no key.
fn completion_adapter(
    config: &GrocerConfig,
) -> Result<Option<Arc<dyn CompletionAdapter>>, GrocerError> {
    match AnthropicProvider::from_config(&config.anthropic)? {
        Some(provider) => {
            info!(model = config.anthropic.default_model.as_str(), "text model enabled");
            let provider: Arc<dyn CompletionAdapter> = Arc::new(provider);
            Ok(Some(provider))
        }
        None => {
            info!("no Anthropic API key, suggestions are ranked locally");
            Ok(None)
        }
    }
}

fn build_bot(
    config: &GrocerConfig,
    storage: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    completion: Option<Arc<dyn CompletionAdapter>>,
) -> Result<GrocerBot, GrocerError> {
    let recipes: Arc<dyn RecipeSource> =
        Arc::new(WebRecipeSource::new(&config.recipe, completion.clone())?);
    Ok(GrocerBot::new(
        storage,
        channel,
        recipes,
        completion,
        BotSettings::from_config(&config.bot),
    ))
}

/// Workspace crates whose logs follow `bot.log_level`.
const LOG_TARGETS: &[&str] = &[
    "grocer",
    "grocer_bot",
    "grocer_suggest",
    "grocer_session",
    "grocer_recipe",
    "grocer_anthropic",
    "grocer_telegram",
    "grocer_storage",
];

/// Default filter directive when `RUST_LOG` is unset; other crates log at warn.
fn log_filter(log_level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Initializes the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
