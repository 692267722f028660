//! Ingestion of raw upstream feeds into a typed [`Dataset`].
//!
//! ```text
//! raw JSON feeds ──► envelope (find the row array)
//!                ──► normalizer (alias tables, coordinate validation)
//!                ──► Dataset + LoadReport
//! ```
//!
//! Ingestion is pure: fetching lives in [`crate::upstream`].

pub mod aliases;
pub mod envelope;
pub mod fingerprint;
pub mod normalizer;

use std::fmt;

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{BoundingBox, Dataset, FeedInsights};

pub use fingerprint::calculate_fingerprint;
pub use normalizer::{extract_coordinates, normalize_sample, normalize_school, normalize_site};

/// The three upstream feeds the map view is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Capacity,
    CandidateSites,
    TravelTimes,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Capacity, Feed::CandidateSites, Feed::TravelTimes];

    /// Stable short name, also used as the fixture file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Feed::Capacity => "capacity",
            Feed::CandidateSites => "candidate_sites",
            Feed::TravelTimes => "travel_times",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw payloads as received, one per feed. A failed feed is an empty array.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeeds {
    pub capacity: Value,
    pub sites: Value,
    pub travel: Value,
}

impl Default for RawFeeds {
    fn default() -> Self {
        Self {
            capacity: Value::Array(vec![]),
            sites: Value::Array(vec![]),
            travel: Value::Array(vec![]),
        }
    }
}

/// Why a feed contributed no rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedFailure {
    pub message: String,
    pub retryable: bool,
    pub attempts: u32,
}

/// Per-feed ingestion counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedReport {
    pub feed: Feed,
    /// Rows found in the envelope.
    pub received: usize,
    /// Rows turned into records.
    pub accepted: usize,
    /// Accepted records without a valid location.
    pub unlocated: usize,
    pub failure: Option<FeedFailure>,
}

impl FeedReport {
    fn new(feed: Feed) -> Self {
        Self {
            feed,
            received: 0,
            accepted: 0,
            unlocated: 0,
            failure: None,
        }
    }
}

/// Outcome of one dataset load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub feeds: Vec<FeedReport>,
    pub fingerprint: String,
}

impl LoadReport {
    pub fn feed(&self, feed: Feed) -> Option<&FeedReport> {
        self.feeds.iter().find(|r| r.feed == feed)
    }

    pub fn record_failure(&mut self, feed: Feed, failure: FeedFailure) {
        if let Some(report) = self.feeds.iter_mut().find(|r| r.feed == feed) {
            report.failure = Some(failure);
        }
    }

    pub fn failed_feeds(&self) -> Vec<Feed> {
        self.feeds
            .iter()
            .filter(|r| r.failure.is_some())
            .map(|r| r.feed)
            .collect()
    }

    pub fn all_failed(&self) -> bool {
        !self.feeds.is_empty() && self.feeds.iter().all(|r| r.failure.is_some())
    }
}

/// Normalize raw feeds into a dataset.
pub fn build_dataset(raw: &RawFeeds, region: &BoundingBox) -> (Dataset, LoadReport) {
    let mut capacity_report = FeedReport::new(Feed::Capacity);
    let school_rows = envelope::school_rows(&raw.capacity);
    let schools: Vec<_> = school_rows
        .iter()
        .enumerate()
        .map(|(row, record)| normalize_school(record, row, region))
        .collect();
    capacity_report.received = school_rows.len();
    capacity_report.accepted = schools.len();
    capacity_report.unlocated = schools.iter().filter(|s| s.location.is_none()).count();

    let mut site_report = FeedReport::new(Feed::CandidateSites);
    let site_rows = envelope::site_rows(&raw.sites);
    let sites: Vec<_> = site_rows
        .iter()
        .map(|record| normalize_site(record, region))
        .collect();
    site_report.received = site_rows.len();
    site_report.accepted = sites.len();
    site_report.unlocated = sites.iter().filter(|s| s.location.is_none()).count();

    let mut travel_report = FeedReport::new(Feed::TravelTimes);
    let travel_rows = envelope::travel_rows(&raw.travel);
    let samples: Vec<_> = travel_rows
        .iter()
        .filter_map(|record| normalize_sample(record, region))
        .collect();
    travel_report.received = travel_rows.len();
    travel_report.accepted = samples.len();
    travel_report.unlocated = samples.iter().filter(|s| s.location.is_none()).count();

    let fingerprint = calculate_fingerprint(raw);
    info!(
        "Built dataset {}: {} schools, {} travel samples, {} candidate sites",
        &fingerprint[..12],
        schools.len(),
        samples.len(),
        sites.len()
    );

    let dataset = Dataset {
        schools,
        samples,
        sites,
        insights: FeedInsights {
            site_analysis: envelope::insights(&raw.sites),
            travel_analysis: envelope::insights(&raw.travel),
        },
        fingerprint: fingerprint.clone(),
        loaded_at: Utc::now(),
    };
    let report = LoadReport {
        feeds: vec![capacity_report, site_report, travel_report],
        fingerprint,
    };
    (dataset, report)
}
