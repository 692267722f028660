//! Shared state of the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{DatasetHandle, JobTracker, SessionRegistry};
use crate::upstream::UpstreamSource;

#[derive(Clone)]
pub struct AppState {
    pub dataset: DatasetHandle,
    pub sessions: SessionRegistry,
    pub jobs: JobTracker,
    pub source: Arc<dyn UpstreamSource>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// State around an already loaded dataset. Sessions accept overrides for
    /// the dataset's schools.
    pub fn new(config: AppConfig, source: Arc<dyn UpstreamSource>, dataset: DatasetHandle) -> Self {
        let sessions = SessionRegistry::new(config.server.max_sessions, dataset.current().school_ids());
        Self {
            dataset,
            sessions,
            jobs: JobTracker::new(),
            source,
            config: Arc::new(config),
        }
    }
}
