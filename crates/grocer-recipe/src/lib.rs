// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe source for the Grocer list bot.
//!
//! [`WebRecipeSource`] downloads a recipe page (retrying, then trying a
//! reader mirror), reads its schema.org JSON-LD, and when that is missing
//! asks the text model to extract the recipe from the page text.

pub mod extract;
pub mod fetch;
pub mod llm;

use std::sync::Arc;

use async_trait::async_trait;
use grocer_config::model::RecipeConfig;
use grocer_core::error::GrocerError;
use grocer_core::traits::{CompletionAdapter, PluginAdapter, RecipeSource};
use grocer_core::types::{AdapterType, HealthStatus, RecipePage};
use tracing::{debug, info};

use crate::extract::{DEFAULT_TITLE, extract_json_ld, html_title, page_text};
use crate::fetch::PageFetcher;

pub use crate::llm::clean_ingredients;

/// Fetches recipes from the web.
pub struct WebRecipeSource {
    fetcher: PageFetcher,
    completion: Option<Arc<dyn CompletionAdapter>>,
    max_page_chars: usize,
}

impl WebRecipeSource {
    pub fn new(
        config: &RecipeConfig,
        completion: Option<Arc<dyn CompletionAdapter>>,
    ) -> Result<Self, GrocerError> {
        Ok(Self::with_fetcher(
            PageFetcher::new(config)?,
            completion,
            config.max_page_chars,
        ))
    }

    pub fn with_fetcher(
        fetcher: PageFetcher,
        completion: Option<Arc<dyn CompletionAdapter>>,
        max_page_chars: usize,
    ) -> Self {
        Self {
            fetcher,
            completion,
            max_page_chars,
        }
    }
}

#[async_trait]
impl PluginAdapter for WebRecipeSource {
    fn name(&self) -> &str {
        "web"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecipeSource
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        Ok(())
    }
}

#[async_trait]
impl RecipeSource for WebRecipeSource {
    async fn fetch(&self, url: &str) -> Result<RecipePage, GrocerError> {
        let page = self.fetcher.fetch_page(url).await?;
        let fallback_title = html_title(&page.body).unwrap_or_else(|| DEFAULT_TITLE.to_string());

        if let Some(data) = extract_json_ld(&page.body)
            && !data.ingredients.is_empty()
        {
            info!(url, count = data.ingredients.len(), "recipe read from JSON-LD");
            return Ok(RecipePage {
                url: url.to_string(),
                title: non_empty_or(data.title, fallback_title),
                ingredients: data.ingredients,
                steps: data.steps,
            });
        }

        if let Some(completion) = &self.completion {
            let text = page_text(&page.body, self.max_page_chars);
            if let Some(data) = llm::extract_with_model(completion.as_ref(), url, &text).await
                && !data.ingredients.is_empty()
            {
                info!(url, count = data.ingredients.len(), "recipe extracted by text model");
                return Ok(RecipePage {
                    url: url.to_string(),
                    title: non_empty_or(data.title, fallback_title),
                    ingredients: data.ingredients,
                    steps: data.steps,
                });
            }
        }

        debug!(url, via_mirror = page.via_mirror, "no ingredients found on page");
        Ok(RecipePage {
            url: url.to_string(),
            title: fallback_title,
            ingredients: Vec::new(),
            steps: Vec::new(),
        })
    }
}

fn non_empty_or(value: String, fallback: String) -> String {
    if value.trim().is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use grocer_test_utils::MockProvider;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipe"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn source(completion: Option<Arc<dyn CompletionAdapter>>) -> WebRecipeSource {
        let config = RecipeConfig {
            mirror_prefix: String::new(),
            ..RecipeConfig::default()
        };
        let fetcher = PageFetcher::new(&config)
            .unwrap()
            .with_backoff(Duration::ZERO);
        WebRecipeSource::with_fetcher(fetcher, completion, 1000)
    }

    #[tokio::test]
    async fn json_ld_recipe_is_returned() {
        let server = serve(
            "<html><head><title>Site</title><script type=\"application/ld+json\">\
             {\"@type\":\"Recipe\",\"name\":\"Pancakes\",\"recipeIngredient\":[\"1 cup milk\",\"2 eggs\"]}\
             </script></head></html>",
        )
        .await;

        let url = format!("{}/recipe", server.uri());
        let page = source(None).fetch(&url).await.unwrap();
        assert_eq!(page.title, "Pancakes");
        assert_eq!(page.ingredients, vec!["1 cup milk", "2 eggs"]);
        assert_eq!(page.url, url);
    }

    #[tokio::test]
    async fn model_extraction_when_json_ld_missing() {
        let server = serve("<html><head><title>Grandma's Stew</title></head><body>beef, carrots</body></html>").await;
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"title": "", "ingredients": ["beef", "carrots"], "steps": ["stew"]}"#.into(),
        ]));
        let completion: Arc<dyn CompletionAdapter> = provider.clone();

        let page = source(Some(completion))
            .fetch(&format!("{}/recipe", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.title, "Grandma's Stew");
        assert_eq!(page.ingredients, vec!["beef", "carrots"]);
        assert_eq!(page.steps, vec!["stew"]);

        let calls = provider.calls().await;
        assert!(calls[0].user.contains("beef, carrots"));
        assert!(!calls[0].user.contains("<body>"));
    }

    #[tokio::test]
    async fn page_without_recipe_has_no_ingredients() {
        let server = serve("<html><body>About us</body></html>").await;
        let page = source(None)
            .fetch(&format!("{}/recipe", server.uri()))
            .await
            .unwrap();
        assert!(page.ingredients.is_empty());
        assert_eq!(page.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn unreachable_page_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = source(None).fetch(&format!("{}/recipe", server.uri())).await;
        assert!(matches!(result, Err(GrocerError::Upstream { .. })));
    }

    #[test]
    fn plugin_metadata() {
        let source = source(None);
        assert_eq!(source.name(), "web");
        assert_eq!(source.adapter_type(), AdapterType::RecipeSource);
    }
}
