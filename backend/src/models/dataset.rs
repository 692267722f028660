use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CandidateSite, SchoolRecord, TravelSample};
use crate::api::SchoolId;

/// Free-form analysis text attached to upstream responses, passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedInsights {
    pub site_analysis: Option<serde_json::Value>,
    pub travel_analysis: Option<serde_json::Value>,
}

/// The immutable inputs of the simulation for one load.
///
/// A dataset is replaced wholesale on reload; nothing mutates it in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub schools: Vec<SchoolRecord>,
    pub samples: Vec<TravelSample>,
    pub sites: Vec<CandidateSite>,
    pub insights: FeedInsights,
    /// SHA-256 of the raw feeds this dataset was built from.
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            schools: vec![],
            samples: vec![],
            sites: vec![],
            insights: FeedInsights::default(),
            fingerprint: String::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn school_ids(&self) -> HashSet<SchoolId> {
        self.schools.iter().map(|s| s.id.clone()).collect()
    }

    pub fn find_school(&self, id: &SchoolId) -> Option<&SchoolRecord> {
        self.schools.iter().find(|s| &s.id == id)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}
