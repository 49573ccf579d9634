// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One POST to the Messages endpoint, retried once when Anthropic is busy.

use std::time::Duration;

use grocer_core::GrocerError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{CompletionBody, ErrorBody, Reply};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const RETRY_AFTER: Duration = Duration::from_secs(1);

/// Thin HTTP client for single-turn completions.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    url: String,
    retry_after: Duration,
}

/// Result of one POST that did not fail outright.
enum Attempt {
    Done(Reply),
    /// Rate limited or overloaded; worth one more try.
    Busy(GrocerError),
}

impl AnthropicClient {
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, GrocerError> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| GrocerError::Config("anthropic.api_key is not a valid header value".into()))?;
        key.set_sensitive(true);
        let version = HeaderValue::from_str(api_version).map_err(|_| {
            GrocerError::Config("anthropic.api_version is not a valid header value".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key);
        headers.insert("anthropic-version", version);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| provider_error("cannot build the Anthropic HTTP client", e))?;

        Ok(Self {
            http,
            url: MESSAGES_URL.to_string(),
            retry_after: RETRY_AFTER,
        })
    }

    /// Points the client at another endpoint, e.g. a wiremock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_retry_after(mut self, pause: Duration) -> Self {
        self.retry_after = pause;
        self
    }

    /// Sends `body`. A 429/500/503/529 answer is retried once.
    pub async fn complete(&self, body: &CompletionBody<'_>) -> Result<Reply, GrocerError> {
        match self.post(body).await? {
            Attempt::Done(reply) => Ok(reply),
            Attempt::Busy(first) => {
                warn!(error = %first, "Anthropic busy, retrying once");
                tokio::time::sleep(self.retry_after).await;
                match self.post(body).await? {
                    Attempt::Done(reply) => Ok(reply),
                    Attempt::Busy(second) => Err(second),
                }
            }
        }
    }

    async fn post(&self, body: &CompletionBody<'_>) -> Result<Attempt, GrocerError> {
        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| provider_error("request to Anthropic failed", e))?;

        let status = response.status();
        debug!(%status, "Anthropic answered");
        if status.is_success() {
            let reply = response
                .json::<Reply>()
                .await
                .map_err(|e| provider_error("unreadable Anthropic reply", e))?;
            return Ok(Attempt::Done(reply));
        }

        let text = response.text().await.unwrap_or_default();
        let rejection = rejection(status, &text);
        if matches!(status.as_u16(), 429 | 500 | 503 | 529) {
            Ok(Attempt::Busy(rejection))
        } else {
            Err(rejection)
        }
    }
}

fn rejection(status: StatusCode, text: &str) -> GrocerError {
    let message = match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => format!("Anthropic {status}: {}: {}", body.error.kind, body.error.message),
        Err(_) => format!("Anthropic {status}: {text}"),
    };
    GrocerError::Provider {
        message,
        source: None,
    }
}

fn provider_error(context: &str, e: reqwest::Error) -> GrocerError {
    GrocerError::Provider {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}
