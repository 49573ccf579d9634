// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-completion adapter trait (Anthropic).

use async_trait::async_trait;

use crate::error::GrocerError;
use crate::traits::adapter::PluginAdapter;

/// A stateless request/response text model.
///
/// Every call made through this trait is advisory: callers treat any error
/// or unusable reply as "no refinement available".
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends one system + user prompt and returns the concatenated reply text.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GrocerError>;
}
