// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock recipe source keyed by URL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use grocer_core::traits::adapter::PluginAdapter;
use grocer_core::traits::recipe::RecipeSource;
use grocer_core::types::{AdapterType, HealthStatus, RecipePage};
use grocer_core::GrocerError;

/// Serves registered pages; any other URL is unreachable.
#[derive(Default)]
pub struct MockRecipeSource {
    pages: Arc<Mutex<HashMap<String, RecipePage>>>,
}

impl MockRecipeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page with the given title and ingredient lines.
    pub async fn add_page(&self, url: &str, title: &str, ingredients: &[&str]) {
        let page = RecipePage {
            url: url.to_string(),
            title: title.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: Vec::new(),
        };
        self.pages.lock().await.insert(url.to_string(), page);
    }
}

#[async_trait]
impl PluginAdapter for MockRecipeSource {
    fn name(&self) -> &str {
        "mock-recipe"
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
impl RecipeSource for MockRecipeSource {
    async fn fetch(&self, url: &str) -> Result<RecipePage, GrocerError> {
        self.pages
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| GrocerError::Upstream {
                message: format!("no mock page for {url}"),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_registered_pages_only() {
        let source = MockRecipeSource::new();
        source
            .add_page("https://cook.test/soup", "Soup", &["1 onion"])
            .await;

        let page = source.fetch("https://cook.test/soup").await.unwrap();
        assert_eq!(page.title, "Soup");
        assert_eq!(page.ingredients, vec!["1 onion"]);

        let err = source.fetch("https://cook.test/other").await.unwrap_err();
        assert!(matches!(err, GrocerError::Upstream { .. }));
    }
}
