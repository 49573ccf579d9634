// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipe source trait.

use async_trait::async_trait;

use crate::error::GrocerError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RecipePage;

/// Supplies raw ingredient and instruction strings for a recipe URL.
#[async_trait]
pub trait RecipeSource: PluginAdapter {
    /// Fetches and parses the recipe at `url`.
    ///
    /// Unreachable pages are `GrocerError::Upstream`. A page without
    /// ingredients is returned with an empty `ingredients` list.
    async fn fetch(&self, url: &str) -> Result<RecipePage, GrocerError>;
}
