//! Public API surface for the seatmap backend.
//!
//! Consolidates the types returned to the dashboard. Input-side types derive
//! Serialize/Deserialize; computed views holding static labels are
//! Serialize-only.

pub use crate::ingest::LoadReport;
pub use crate::models::{
    BoundingBox, CandidateSite, Dataset, FeedInsights, Gender, GeoPoint, SchoolRecord,
    SchoolType, TravelSample,
};
pub use crate::services::district::{DistrictAggregate, DistrictSeverity, SeverityLevel};
pub use crate::services::filter::{FilterCriteria, TierToggles};
pub use crate::services::impact::DistrictImpact;
pub use crate::services::map_view::{
    DistrictCircle, LayerToggles, MapView, SchoolMarker, TierLegendEntry,
};
pub use crate::services::session::{SessionPhase, SessionSnapshot};
pub use crate::services::utilization::{Classification, Tier};

use serde::{Deserialize, Serialize};
use std::fmt;

/// School identifier as supplied by the upstream capacity feed.
///
/// Upstream ids may arrive as JSON numbers or strings; both are kept in their
/// textual form so `42` and `"42"` address the same school.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolId(pub String);

impl SchoolId {
    pub fn new(value: impl Into<String>) -> Self {
        SchoolId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SchoolId {
    fn from(value: &str) -> Self {
        SchoolId(value.to_string())
    }
}

impl From<String> for SchoolId {
    fn from(value: String) -> Self {
        SchoolId(value)
    }
}
