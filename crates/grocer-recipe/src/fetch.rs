// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page download with bounded retry and a reader-mirror fallback.

use std::time::Duration;

use grocer_config::model::RecipeConfig;
use grocer_core::GrocerError;
use tracing::{debug, warn};

/// Pause before the second direct attempt; doubles for each further one.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// A downloaded page body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    /// The body came from the mirror reader rather than the page itself.
    pub via_mirror: bool,
}

/// Downloads recipe pages.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    max_attempts: u32,
    timeout: Duration,
    backoff: Duration,
    mirror_prefix: String,
}

impl PageFetcher {
    pub fn new(config: &RecipeConfig) -> Result<Self, GrocerError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GrocerError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            timeout: Duration::from_secs(config.timeout_secs),
            backoff: RETRY_BACKOFF,
            mirror_prefix: config.mirror_prefix.trim().to_string(),
        })
    }

    /// Overrides the pause between direct attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetches `url`, falling back to `{mirror_prefix}{url}` once every direct
    /// attempt has failed.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, GrocerError> {
        validate_url(url)?;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.backoff * 2u32.saturating_pow(attempt - 1)).await;
            }
            match self.get(url).await {
                Ok(body) => {
                    debug!(url, attempt, "recipe page fetched");
                    return Ok(FetchedPage {
                        body,
                        via_mirror: false,
                    });
                }
                Err(e) => warn!(url, attempt, error = %e, "recipe page fetch failed"),
            }
        }

        if self.mirror_prefix.is_empty() {
            return Err(unreachable_error(url));
        }

        let mirror_url = format!("{}{url}", self.mirror_prefix);
        match self.get(&mirror_url).await {
            Ok(body) => {
                debug!(url, "recipe page fetched through mirror");
                Ok(FetchedPage {
                    body,
                    via_mirror: true,
                })
            }
            Err(e) => {
                warn!(url, error = %e, "mirror fetch failed");
                Err(unreachable_error(url))
            }
        }
    }

    async fn get(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

fn unreachable_error(url: &str) -> GrocerError {
    GrocerError::Upstream {
        message: format!("could not fetch {url}"),
        source: None,
    }
}

/// Accepts only absolute http and https URLs.
pub fn validate_url(url: &str) -> Result<(), GrocerError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| GrocerError::Validation(format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GrocerError::Validation(format!(
            "URL scheme '{scheme}' not allowed. Only http and https are supported."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(mirror_prefix: &str) -> PageFetcher {
        let config = RecipeConfig {
            max_attempts: 3,
            timeout_secs: 5,
            mirror_prefix: mirror_prefix.to_string(),
            ..RecipeConfig::default()
        };
        PageFetcher::new(&config)
            .unwrap()
            .with_backoff(Duration::ZERO)
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(validate_url("https://example.com/pie").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com/pie"),
            Err(GrocerError::Validation(_))
        ));
        assert!(validate_url("not a url").is_err());
    }

    #[tokio::test]
    async fn returns_body_on_first_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pie"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>pie</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let page = fetcher("")
            .fetch_page(&format!("{}/pie", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.body, "<html>pie</html>");
        assert!(!page.via_mirror);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pie"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/pie"))
            .respond_with(ResponseTemplate::new(200).set_body_string("third time"))
            .mount(&server)
            .await;

        let page = fetcher("")
            .fetch_page(&format!("{}/pie", server.uri()))
            .await
            .unwrap();
        assert_eq!(page.body, "third time");
    }

    #[tokio::test]
    async fn falls_back_to_mirror_after_all_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pie"))
            .respond_with(ResponseTemplate::new(403))
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex("^/mirror/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Title: Pie"))
            .expect(1)
            .mount(&server)
            .await;

        let page = fetcher(&format!("{}/mirror/", server.uri()))
            .fetch_page(&format!("{}/pie", server.uri()))
            .await
            .unwrap();
        assert!(page.via_mirror);
        assert_eq!(page.body, "Title: Pie");
    }

    #[tokio::test]
    async fn all_failures_are_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(4)
            .mount(&server)
            .await;

        let result = fetcher(&format!("{}/mirror/", server.uri()))
            .fetch_page(&format!("{}/pie", server.uri()))
            .await;
        assert!(matches!(result, Err(GrocerError::Upstream { .. })));
    }
}
