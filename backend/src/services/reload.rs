//! Dataset reload: fetch, normalize, swap in, prune session overrides.

use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;
use uuid::Uuid;

use super::job_tracker::{JobTracker, LogLevel};
use super::session::SessionRegistry;
use crate::ingest::LoadReport;
use crate::models::{BoundingBox, Dataset};
use crate::upstream::{load_dataset, UpstreamSource};

/// Shared reference to the current dataset and the report it came with.
///
/// Readers take an `Arc<Dataset>` and compute against it without holding the
/// lock; a reload swaps the `Arc`.
#[derive(Clone)]
pub struct DatasetHandle {
    inner: Arc<RwLock<Loaded>>,
}

struct Loaded {
    dataset: Arc<Dataset>,
    report: Option<LoadReport>,
}

impl DatasetHandle {
    pub fn new(dataset: Dataset, report: Option<LoadReport>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Loaded {
                dataset: Arc::new(dataset),
                report,
            })),
        }
    }

    pub fn empty() -> Self {
        Self::new(Dataset::empty(), None)
    }

    pub fn current(&self) -> Arc<Dataset> {
        Arc::clone(&self.inner.read().dataset)
    }

    pub fn report(&self) -> Option<LoadReport> {
        self.inner.read().report.clone()
    }

    /// Swap in a new dataset and rebind `sessions` to its schools.
    ///
    /// The rebind runs under the dataset write lock, so no reader can see the
    /// new dataset while sessions still validate against the old school ids.
    /// Lock order is dataset, then sessions.
    fn install(&self, dataset: Dataset, report: LoadReport, sessions: &SessionRegistry) -> usize {
        let known = dataset.school_ids();
        let mut loaded = self.inner.write();
        let pruned = sessions.rebind(known);
        loaded.dataset = Arc::new(dataset);
        loaded.report = Some(report);
        pruned
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("Every upstream feed failed; keeping dataset {previous_fingerprint}")]
    AllFeedsFailed {
        report: LoadReport,
        previous_fingerprint: String,
    },
}

impl ReloadError {
    pub fn report(&self) -> &LoadReport {
        match self {
            ReloadError::AllFeedsFailed { report, .. } => report,
        }
    }
}

/// Load all feeds and install the result.
///
/// When every feed fails the current dataset is kept and an error returned.
/// Partial failures install the partial dataset.
pub async fn reload_dataset(
    source: &dyn UpstreamSource,
    region: &BoundingBox,
    handle: &DatasetHandle,
    sessions: &SessionRegistry,
) -> Result<LoadReport, ReloadError> {
    let (dataset, report) = load_dataset(source, region).await;

    if report.all_failed() {
        let previous_fingerprint = handle.current().fingerprint.clone();
        warn!("Reload failed for every feed; keeping current dataset");
        return Err(ReloadError::AllFeedsFailed {
            report,
            previous_fingerprint,
        });
    }

    let pruned = handle.install(dataset, report.clone(), sessions);
    info!(
        "Installed dataset {} ({} stale overrides pruned)",
        report.fingerprint, pruned
    );
    Ok(report)
}

/// [`reload_dataset`] as a tracked background job.
pub async fn reload_dataset_job(
    job_id: Uuid,
    tracker: JobTracker,
    source: Arc<dyn UpstreamSource>,
    region: BoundingBox,
    handle: DatasetHandle,
    sessions: SessionRegistry,
) {
    tracker.log(&job_id, LogLevel::Info, format!("Fetching feeds from {}", source.describe()));

    match reload_dataset(source.as_ref(), &region, &handle, &sessions).await {
        Ok(report) => {
            for failed in report.failed_feeds() {
                tracker.log(
                    &job_id,
                    LogLevel::Warning,
                    format!("Feed {} failed; loaded without it", failed),
                );
            }
            let dataset = handle.current();
            tracker.log(
                &job_id,
                LogLevel::Success,
                format!(
                    "Loaded {} schools, {} travel samples, {} candidate sites",
                    dataset.schools.len(),
                    dataset.samples.len(),
                    dataset.sites.len()
                ),
            );
            tracker.complete_job(&job_id, report);
        }
        Err(err) => {
            let report = err.report().clone();
            tracker.fail_job(&job_id, err.to_string(), Some(report));
        }
    }
}
