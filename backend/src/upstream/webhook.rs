//! Webhook client for the workflow endpoints.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use super::error::{ErrorContext, UpstreamError, UpstreamResult};
use super::UpstreamSource;
use crate::config::UpstreamSettings;
use crate::ingest::Feed;

/// POSTs an empty JSON object to `<base_url>/<endpoint>` per feed and retries
/// retryable failures with a linear delay.
pub struct WebhookSource {
    client: reqwest::Client,
    settings: UpstreamSettings,
}

impl WebhookSource {
    pub fn new(settings: &UpstreamSettings) -> UpstreamResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| {
                UpstreamError::configuration(
                    format!("Failed to build HTTP client: {}", e),
                    ErrorContext::default(),
                )
            })?;
        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    pub fn url(&self, feed: Feed) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.endpoint(feed).trim_start_matches('/')
        )
    }

    async fn fetch_once(&self, feed: Feed, url: &str) -> UpstreamResult<Value> {
        let context = || ErrorContext::for_feed(feed).with_url(url);

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, context()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} answered {}: {}", url, status, body);
            return Err(UpstreamError::status(status.as_u16(), context()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, context()))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::decode(e.to_string(), context()))
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.settings.retry_delay(attempt)
    }
}

#[async_trait]
impl UpstreamSource for WebhookSource {
    async fn fetch(&self, feed: Feed) -> UpstreamResult<Value> {
        let url = self.url(feed);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            debug!("Fetching {} from {} (attempt {})", feed, url, attempt);
            match self.fetch_once(feed, &url).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        "Fetching {} failed: {}; retrying in {:?} ({} attempts left)",
                        feed,
                        err,
                        delay,
                        max_attempts - attempt
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.with_attempts(attempt)),
            }
        }
    }

    fn describe(&self) -> String {
        format!("webhook {}", self.settings.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let settings = UpstreamSettings {
            base_url: "http://localhost:9999/webhook/".to_string(),
            ..UpstreamSettings::default()
        };
        let source = WebhookSource::new(&settings).unwrap();
        assert_eq!(
            source.url(Feed::Capacity),
            "http://localhost:9999/webhook/school-analysis"
        );
    }
}
