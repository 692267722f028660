//! In-memory and on-disk feed payloads.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log::info;
use serde_json::Value;

use super::error::{ErrorContext, UpstreamError, UpstreamResult};
use super::UpstreamSource;
use crate::ingest::Feed;

/// Serves fixed payloads. A feed with no payload fails with a non-retryable
/// status 404.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    payloads: HashMap<Feed, Value>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, feed: Feed, payload: Value) -> Self {
        self.payloads.insert(feed, payload);
        self
    }

    /// Read `<dir>/<feed>.json` for every feed. Missing files are skipped;
    /// unreadable or malformed ones are an error.
    pub fn from_dir(dir: impl AsRef<Path>) -> UpstreamResult<Self> {
        let dir = dir.as_ref();
        let mut source = Self::new();
        for feed in Feed::ALL {
            let path = dir.join(format!("{}.json", feed.name()));
            if !path.exists() {
                continue;
            }
            let context = || ErrorContext::for_feed(feed).with_url(path.display().to_string());
            let content = fs::read_to_string(&path)
                .map_err(|e| UpstreamError::configuration(e.to_string(), context()))?;
            let payload = serde_json::from_str(&content)
                .map_err(|e| UpstreamError::decode(e.to_string(), context()))?;
            source.payloads.insert(feed, payload);
        }
        info!(
            "Loaded {} fixture feeds from {}",
            source.payloads.len(),
            dir.display()
        );
        Ok(source)
    }
}

#[async_trait]
impl UpstreamSource for StaticSource {
    async fn fetch(&self, feed: Feed) -> UpstreamResult<Value> {
        self.payloads
            .get(&feed)
            .cloned()
            .ok_or_else(|| {
                UpstreamError::status(
                    404,
                    ErrorContext::for_feed(feed).with_details("no fixture for feed"),
                )
            })
    }

    fn describe(&self) -> String {
        format!("static ({} feeds)", self.payloads.len())
    }
}
