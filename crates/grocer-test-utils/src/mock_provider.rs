// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-completion adapter for deterministic testing.
//!
//! `MockProvider` implements `CompletionAdapter` with pre-configured replies,
//! so refinement and recipe cleanup can be tested without an API key.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use grocer_core::traits::adapter::PluginAdapter;
use grocer_core::traits::completion::CompletionAdapter;
use grocer_core::types::{AdapterType, HealthStatus};
use grocer_core::GrocerError;

/// One call seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// A mock completion provider that returns queued replies.
///
/// Replies are popped from a FIFO queue. A queued `None` makes that call
/// fail with a provider error. When the queue is empty, `"[]"` is returned.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Option<String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Some).collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Some(text.into()));
    }

    /// Queue a transport failure.
    pub async fn add_failure(&self) {
        self.responses.lock().await.push_back(None);
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, GrocerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), GrocerError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for MockProvider {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GrocerError> {
        self.calls.lock().await.push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens,
        });
        match self.responses.lock().await.pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(GrocerError::Provider {
                message: "mock provider failure".to_string(),
                source: None,
            }),
            None => Ok("[]".to_string()),
        }
    }
}
