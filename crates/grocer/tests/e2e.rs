// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests wiring the real recipe source and Anthropic provider
//! against local HTTP mocks, with temp SQLite and a mock channel.

use std::sync::Arc;
use std::time::Duration;

use grocer_anthropic::AnthropicProvider;
use grocer_anthropic::client::AnthropicClient;
use grocer_bot::{BotSettings, GrocerBot};
use grocer_config::model::RecipeConfig;
use grocer_core::types::{ChatInfo, InboundEvent};
use grocer_core::{ChannelAdapter, CompletionAdapter, RecipeSource, StorageAdapter};
use grocer_recipe::WebRecipeSource;
use grocer_recipe::fetch::PageFetcher;
use grocer_test_utils::TestHarness;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT: i64 = 7;

fn recipe_config() -> RecipeConfig {
    RecipeConfig {
        max_attempts: 1,
        timeout_secs: 2,
        mirror_prefix: String::new(),
        ..RecipeConfig::default()
    }
}

fn web_source(completion: Option<Arc<dyn CompletionAdapter>>) -> Arc<dyn RecipeSource> {
    let config = recipe_config();
    let fetcher = PageFetcher::new(&config)
        .unwrap()
        .with_backoff(Duration::from_millis(1));
    Arc::new(WebRecipeSource::with_fetcher(
        fetcher,
        completion,
        config.max_page_chars,
    ))
}

fn anthropic(server: &MockServer) -> Arc<dyn CompletionAdapter> {
    let client = AnthropicClient::new("sk-ant-test", "2023-06-01")
        .unwrap()
        .with_base_url(server.uri())
        .with_retry_after(Duration::ZERO);
    Arc::new(AnthropicProvider::with_client(client, "claude-test", 1024, 0.2))
}

fn model_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 10, "output_tokens": 5 }
    })
}

async fn say(bot: &GrocerBot, text: &str) {
    bot.handle_event(InboundEvent::Text {
        chat: ChatInfo::id(CHAT),
        text: text.to_string(),
    })
    .await
    .unwrap();
}

// ---- Test 1: Recipe import from a real page ----

#[tokio::test]
async fn recipe_from_json_ld_page_opens_picker() {
    let pages = MockServer::start().await;
    let html = r#"<html><head><title>Ignored</title>
<script type="application/ld+json">
{"@context":"https://schema.org","@graph":[
  {"@type":"WebPage","name":"Page"},
  {"@type":"Recipe","name":"Lemon Cake",
   "recipeIngredient":["200 g flour","2 lemons","1 cup sugar"],
   "recipeInstructions":[{"@type":"HowToStep","text":"Mix."}]}
]}
</script></head><body></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/cake"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&pages)
        .await;

    let harness = TestHarness::new().await.unwrap();
    let channel: Arc<dyn ChannelAdapter> = harness.channel.clone();
    let bot = GrocerBot::new(
        harness.storage(),
        channel,
        web_source(None),
        None,
        BotSettings::default(),
    );

    say(&bot, &format!("/recipe {}/cake", pages.uri())).await;

    let sent = harness.channel.sent_messages().await;
    let picker = sent.last().unwrap();
    assert_eq!(picker.text, "Ingredients for Lemon Cake (page 1/1, selected 0):");
    let keyboard = picker.keyboard.as_ref().unwrap();
    let labels: Vec<&str> = keyboard.rows[..3]
        .iter()
        .map(|row| row[0].label.as_str())
        .collect();
    assert_eq!(labels, vec!["200 g flour", "2 lemons", "1 cup sugar"]);
}

#[tokio::test]
async fn unreachable_recipe_page_is_reported() {
    let pages = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&pages)
        .await;

    let harness = TestHarness::new().await.unwrap();
    let channel: Arc<dyn ChannelAdapter> = harness.channel.clone();
    let bot = GrocerBot::new(
        harness.storage(),
        channel,
        web_source(None),
        None,
        BotSettings::default(),
    );

    say(&bot, &format!("/recipe {}/gone", pages.uri())).await;

    assert_eq!(
        harness.channel.last_text().await.as_deref(),
        Some("I couldn't read that recipe URL. Try another one.")
    );
}

// ---- Test 2: Model-refined suggestions ----

#[tokio::test]
async fn model_refines_weekly_suggestions() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(r#"["milk"]"#)))
        .expect(1)
        .mount(&api)
        .await;

    let harness = TestHarness::new().await.unwrap();
    let storage = harness.storage();
    for (name, accepts) in [("bread", 4), ("milk", 2), ("candles", 1)] {
        for _ in 0..accepts {
            storage.increment_stats(CHAT, name, name, true).await.unwrap();
        }
    }
    let completion = anthropic(&api);
    let channel: Arc<dyn ChannelAdapter> = harness.channel.clone();
    let bot = GrocerBot::new(
        storage,
        channel,
        web_source(Some(completion.clone())),
        Some(completion),
        BotSettings::default(),
    );

    say(&bot, "/suggest").await;

    let sent = harness.channel.sent_messages().await;
    let keyboard = sent.last().unwrap().keyboard.as_ref().unwrap();
    assert_eq!(keyboard.rows.len(), 1);
    assert_eq!(keyboard.rows[0][0].label, "Add milk");
}

#[tokio::test]
async fn failing_model_falls_back_to_local_ranking() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "type": "error",
            "error": { "type": "invalid_request_error", "message": "bad" }
        })))
        .mount(&api)
        .await;

    let harness = TestHarness::new().await.unwrap();
    let storage = harness.storage();
    storage.increment_stats(CHAT, "eggs", "eggs", true).await.unwrap();
    let completion = anthropic(&api);
    let channel: Arc<dyn ChannelAdapter> = harness.channel.clone();
    let bot = GrocerBot::new(
        storage,
        channel,
        web_source(None),
        Some(completion),
        BotSettings::default(),
    );

    say(&bot, "/suggest").await;

    let sent = harness.channel.sent_messages().await;
    let keyboard = sent.last().unwrap().keyboard.as_ref().unwrap();
    assert_eq!(keyboard.rows[0][0].label, "Add eggs");
}
