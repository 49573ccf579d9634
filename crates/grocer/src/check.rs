// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `grocer check-config`: print what the loaded configuration resolves to.

use grocer_anthropic::resolve_api_key;
use grocer_config::model::GrocerConfig;

/// Human-readable summary of a validated configuration. Secrets are not shown.
pub fn summary(config: &GrocerConfig) -> String {
    let admin = config
        .bot
        .admin_chat_id
        .map_or_else(|| "any chat".to_string(), |id| id.to_string());
    let telegram = if config.telegram.bot_token.is_some() {
        "token set"
    } else {
        "no token (serve and suggest will fail)"
    };
    let model = if !config.anthropic.enabled {
        "disabled".to_string()
    } else if resolve_api_key(&config.anthropic.api_key).is_some() {
        config.anthropic.default_model.clone()
    } else {
        "no API key (local ranking only)".to_string()
    };
    let schedule = if config.schedule.enabled {
        format!(
            "`{}` in {}",
            config.schedule.weekly_cron, config.schedule.timezone
        )
    } else {
        "disabled".to_string()
    };
    let mirror = if config.recipe.mirror_prefix.is_empty() {
        "none"
    } else {
        config.recipe.mirror_prefix.as_str()
    };

    [
        "configuration OK".to_string(),
        format!("  bot:        {} (log level {})", config.bot.name, config.bot.log_level),
        format!("  serves:     {admin}"),
        format!("  suggests:   {} items per batch", config.bot.suggestion_count),
        format!("  telegram:   {telegram}"),
        format!("  model:      {model}"),
        format!("  database:   {}", config.storage.database_path),
        format!("  schedule:   {schedule}"),
        format!("  ttl:        {}h", config.sessions.ttl_hours),
        format!(
            "  recipes:    {} attempts, {}s timeout, mirror {mirror}",
            config.recipe.max_attempts, config.recipe.timeout_secs
        ),
    ]
    .join("\n")
}

pub fn print_summary(config: &GrocerConfig) {
    println!("{}", summary(config));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_hides_secrets() {
        let mut config = GrocerConfig::default();
        config.telegram.bot_token = Some("123:SECRET".into());
        config.anthropic.api_key = Some("sk-ant-SECRET".into());
        config.bot.admin_chat_id = Some(-42);

        let text = summary(&config);
        assert!(!text.contains("SECRET"));
        assert!(text.contains("serves:     -42"));
        assert!(text.contains("token set"));
        assert!(text.contains("claude-"));
    }

    #[test]
    fn summary_reports_disabled_parts() {
        let mut config = GrocerConfig::default();
        config.anthropic.enabled = false;
        config.schedule.enabled = false;
        config.recipe.mirror_prefix = String::new();

        let text = summary(&config);
        assert!(text.contains("model:      disabled"));
        assert!(text.contains("schedule:   disabled"));
        assert!(text.contains("mirror none"));
    }
}
