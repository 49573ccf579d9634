// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express. All failures are collected;
//! validation does not stop at the first one.

use chrono_tz::Tz;
use croner::Cron;

use crate::diagnostic::ConfigError;
use crate::model::GrocerConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &GrocerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.suggestion_count == 0 {
        errors.push(ConfigError::invalid(
            "bot.suggestion_count",
            "must be at least 1",
        ));
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::invalid(
            "telegram.bot_token",
            "must not be empty when set",
        ));
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::invalid(
            "anthropic.max_tokens",
            "must be at least 1",
        ));
    }

    if !(0.0..=1.0).contains(&config.anthropic.temperature) {
        errors.push(ConfigError::invalid(
            "anthropic.temperature",
            format!("must be between 0 and 1, got {}", config.anthropic.temperature),
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid(
            "storage.database_path",
            "must not be empty",
        ));
    }

    if let Err(e) = config.schedule.weekly_cron.parse::<Cron>() {
        errors.push(ConfigError::invalid(
            "schedule.weekly_cron",
            format!("`{}` is not a valid cron expression: {e}", config.schedule.weekly_cron),
        ));
    }

    if config.schedule.timezone.parse::<Tz>().is_err() {
        errors.push(ConfigError::invalid(
            "schedule.timezone",
            format!(
                "`{}` is not an IANA time zone name (e.g. `Europe/Berlin`)",
                config.schedule.timezone
            ),
        ));
    }

    if config.sessions.ttl_hours == 0 {
        errors.push(ConfigError::invalid(
            "sessions.ttl_hours",
            "must be at least 1",
        ));
    }

    if config.recipe.max_attempts == 0 {
        errors.push(ConfigError::invalid(
            "recipe.max_attempts",
            "must be at least 1",
        ));
    }

    if config.recipe.timeout_secs == 0 {
        errors.push(ConfigError::invalid(
            "recipe.timeout_secs",
            "must be at least 1",
        ));
    }

    let mirror = config.recipe.mirror_prefix.trim();
    if !mirror.is_empty() && !(mirror.starts_with("http://") || mirror.starts_with("https://")) {
        errors.push(ConfigError::invalid(
            "recipe.mirror_prefix",
            format!("`{mirror}` must start with http:// or https://"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
