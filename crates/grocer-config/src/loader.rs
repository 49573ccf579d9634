// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./grocer.toml` > `~/.config/grocer/grocer.toml` > `/etc/grocer/grocer.toml`
//! with environment variable overrides via `GROCER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GrocerConfig;

/// Config sections that env vars may address, as `GROCER_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &[
    "bot",
    "telegram",
    "anthropic",
    "storage",
    "schedule",
    "sessions",
    "recipe",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/grocer/grocer.toml` (system-wide)
/// 3. `~/.config/grocer/grocer.toml` (user XDG config)
/// 4. `./grocer.toml` (local directory)
/// 5. `GROCER_*` environment variables
pub fn load_config() -> Result<GrocerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<GrocerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GrocerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<GrocerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GrocerConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(GrocerConfig::default()))
        .merge(Toml::file("/etc/grocer/grocer.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("grocer/grocer.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("grocer.toml"))
        .merge(env_provider())
}

/// Maps a prefix-stripped, lowercased env var name to a dotted config key.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `telegram_bot_token` maps to `telegram.bot_token`, not `telegram.bot.token`.
pub fn env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("GROCER_").map(|key| env_key(key.as_str()).into())
}
