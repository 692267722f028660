//! Fan-out/fan-in dataset load.

use log::{info, warn};
use serde_json::Value;

use super::error::UpstreamResult;
use super::UpstreamSource;
use crate::ingest::{build_dataset, Feed, FeedFailure, LoadReport, RawFeeds};
use crate::models::{BoundingBox, Dataset};

/// Fetch the three feeds concurrently and build a dataset once all of them
/// have resolved. A failed feed contributes an empty array and is recorded in
/// the report; this never fails as a whole.
pub async fn load_dataset(source: &dyn UpstreamSource, region: &BoundingBox) -> (Dataset, LoadReport) {
    info!("Loading dataset from {}", source.describe());

    let (capacity, sites, travel) = tokio::join!(
        source.fetch(Feed::Capacity),
        source.fetch(Feed::CandidateSites),
        source.fetch(Feed::TravelTimes),
    );

    let mut failures = Vec::new();
    let raw = RawFeeds {
        capacity: payload_or_empty(Feed::Capacity, capacity, &mut failures),
        sites: payload_or_empty(Feed::CandidateSites, sites, &mut failures),
        travel: payload_or_empty(Feed::TravelTimes, travel, &mut failures),
    };

    let (dataset, mut report) = build_dataset(&raw, region);
    for (feed, failure) in failures {
        report.record_failure(feed, failure);
    }
    (dataset, report)
}

fn payload_or_empty(
    feed: Feed,
    result: UpstreamResult<Value>,
    failures: &mut Vec<(Feed, FeedFailure)>,
) -> Value {
    match result {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Feed {} unavailable, substituting no rows: {}", feed, err);
            failures.push((
                feed,
                FeedFailure {
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                    attempts: err.context().attempts.max(1),
                },
            ));
            Value::Array(vec![])
        }
    }
}
