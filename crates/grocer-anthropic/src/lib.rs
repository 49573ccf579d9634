// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude completion adapter for the Grocer list bot.
//!
//! [`AnthropicProvider`] answers `complete(system, user, max_tokens)` with one
//! Messages API call. Every caller treats the text as advisory.

pub mod client;
pub mod types;

use async_trait::async_trait;
use grocer_config::model::AnthropicConfig;
use grocer_core::error::GrocerError;
use grocer_core::traits::{CompletionAdapter, PluginAdapter};
use grocer_core::types::{AdapterType, HealthStatus};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{CompletionBody, UserTurn};

/// Anthropic Claude provider implementing [`CompletionAdapter`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> disabled.
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicProvider {
    /// Creates a provider from configuration.
    ///
    /// Returns `Ok(None)` when the text model is disabled or no API key is
    /// available; the bot then runs without refinement or page extraction.
    pub fn from_config(config: &AnthropicConfig) -> Result<Option<Self>, GrocerError> {
        if !config.enabled {
            info!("Anthropic provider disabled by configuration");
            return Ok(None);
        }
        let Some(api_key) = resolve_api_key(&config.api_key) else {
            info!("no Anthropic API key configured, text model disabled");
            return Ok(None);
        };

        let client = AnthropicClient::new(&api_key, &config.api_version)?;
        info!(model = config.default_model, "Anthropic provider initialized");

        Ok(Some(Self::with_client(
            client,
            config.default_model.clone(),
            config.max_tokens,
            config.temperature,
        )))
    }

    /// Creates a provider around an existing client.
    ///
    /// `max_tokens` caps whatever a caller asks for.
    pub fn with_client(
        client: AnthropicClient,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    fn body<'a>(&'a self, system: &'a str, user: &'a str, max_tokens: u32) -> CompletionBody<'a> {
        CompletionBody {
            model: &self.model,
            system,
            messages: [UserTurn::new(user)],
            max_tokens: max_tokens.min(self.max_tokens),
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        // No API call: health checks should not consume tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for AnthropicProvider {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GrocerError> {
        let reply = self.client.complete(&self.body(system, user, max_tokens)).await?;
        if reply.stop_reason.as_deref() == Some("max_tokens") {
            debug!(model = %self.model, "completion cut off at max_tokens");
        }
        Ok(reply.into_text())
    }
}

/// Resolves the API key from config or environment. Empty values count as unset.
pub fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(base_url: &str) -> AnthropicProvider {
        let client = AnthropicClient::new("test-key", "2023-06-01")
            .unwrap()
            .with_base_url(base_url);
        AnthropicProvider::with_client(client, "claude-sonnet-4-20250514", 500, 0.2)
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(
            resolve_api_key(&Some("sk-test-123".into())).as_deref(),
            Some("sk-test-123")
        );
    }

    #[test]
    fn resolve_api_key_blank_config_falls_back_to_env() {
        // Only the fallback is checked; the env may or may not be set.
        if let Some(key) = resolve_api_key(&Some("  ".into())) {
            assert!(!key.trim().is_empty());
        }
    }

    #[test]
    fn disabled_config_builds_no_provider() {
        let config = AnthropicConfig {
            api_key: Some("sk-test".into()),
            enabled: false,
            ..AnthropicConfig::default()
        };
        assert!(AnthropicProvider::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn configured_key_builds_provider() {
        let config = AnthropicConfig {
            api_key: Some("sk-test".into()),
            ..AnthropicConfig::default()
        };
        let provider = AnthropicProvider::from_config(&config).unwrap();
        assert!(provider.is_some());
    }

    #[test]
    fn body_caps_max_tokens_at_configured_limit() {
        let provider = test_provider("http://localhost");
        let body = provider.body("", "hi", 800);
        assert_eq!(body.max_tokens, 500);
        assert_eq!(body.model, "claude-sonnet-4-20250514");

        let body = provider.body("sys", "hi", 400);
        assert_eq!(body.max_tokens, 400);
        assert_eq!(body.system, "sys");
    }

    #[tokio::test]
    async fn complete_returns_joined_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "system": "You are terse.",
                "messages": [{"role": "user", "content": "list"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "text", "text": "[\"milk\""},
                    {"type": "text", "text": "]"}
                ],
                "stop_reason": "end_turn"
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let text = provider.complete("You are terse.", "list", 400).await.unwrap();
        assert_eq!(text, "[\"milk\"]");
    }

    #[test]
    fn plugin_adapter_metadata() {
        let provider = test_provider("http://localhost");
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.version(), semver::Version::new(0, 1, 0));
        assert_eq!(provider.adapter_type(), AdapterType::Completion);
    }
}
