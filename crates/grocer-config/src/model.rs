// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Grocer list bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Grocer configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GrocerConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Anthropic API settings (suggestion refinement, ingredient cleanup).
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Weekly suggestion job settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Selection session and suggestion batch retention.
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Recipe page fetching.
    #[serde(default)]
    pub recipe: RecipeConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot, used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of items offered per suggestion batch.
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,

    /// When set, only this chat may use the bot.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            suggestion_count: default_suggestion_count(),
            admin_chat_id: None,
        }
    }
}

fn default_bot_name() -> String {
    "grocer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_suggestion_count() -> usize {
    5
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `grocer serve`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. Falls back to `ANTHROPIC_API_KEY`; without either
    /// the text model is disabled.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Set to false to disable the text model even when a key is present.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Model used for all completions.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Upper bound on reply tokens for any single call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            enabled: default_true(),
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_version: default_api_version(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.2
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("grocer").join("grocer.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("grocer.db"))
        .to_string_lossy()
        .into_owned()
}

/// Weekly suggestion job configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Run the weekly fan-out while serving.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Five-field cron expression for the fan-out.
    #[serde(default = "default_weekly_cron")]
    pub weekly_cron: String,

    /// IANA zone name (`Europe/Berlin`) that `weekly_cron` is evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weekly_cron: default_weekly_cron(),
            timezone: default_timezone(),
        }
    }
}

fn default_weekly_cron() -> String {
    "0 9 * * MON".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Retention of abandoned sessions and batches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionsConfig {
    /// Sessions and batches older than this are purged on each scheduler tick.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    168
}

/// Recipe fetcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeConfig {
    /// Attempts against the recipe page itself before trying the mirror.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-attempt timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Reader service prefixed to the URL for the final attempt. Empty disables it.
    #[serde(default = "default_mirror_prefix")]
    pub mirror_prefix: String,

    /// User-Agent header sent with page requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page text beyond this many characters is not sent to the text model.
    #[serde(default = "default_max_page_chars")]
    pub max_page_chars: usize,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
            mirror_prefix: default_mirror_prefix(),
            user_agent: default_user_agent(),
            max_page_chars: default_max_page_chars(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_mirror_prefix() -> String {
    "https://r.jina.ai/".to_string()
}

fn default_user_agent() -> String {
    concat!("grocer/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_page_chars() -> usize {
    120_000
}
