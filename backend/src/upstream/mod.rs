//! Raw-data fetch collaborator.
//!
//! The simulation core never talks to the network. Sources implement
//! [`UpstreamSource`] and hand back one raw JSON payload per [`Feed`];
//! [`load_dataset`] fans the three fetches out, joins them, and feeds the
//! result through [`crate::ingest`].

pub mod error;
pub mod fixtures;
pub mod loader;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::UpstreamSettings;
use crate::ingest::Feed;

pub use error::{ErrorContext, UpstreamError, UpstreamResult};
pub use fixtures::StaticSource;
pub use loader::load_dataset;
pub use webhook::WebhookSource;

/// Supplier of raw feed payloads.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    async fn fetch(&self, feed: Feed) -> UpstreamResult<Value>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// Build the source selected by configuration: fixtures when
/// `fixtures_dir` is set, the webhook otherwise.
pub fn source_from_settings(settings: &UpstreamSettings) -> UpstreamResult<Arc<dyn UpstreamSource>> {
    match &settings.fixtures_dir {
        Some(dir) => Ok(Arc::new(StaticSource::from_dir(dir)?)),
        None => Ok(Arc::new(WebhookSource::new(settings)?)),
    }
}
