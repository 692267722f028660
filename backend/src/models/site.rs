use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Default seat count shown for a proposed site that did not state one.
pub const DEFAULT_RECOMMENDED_CAPACITY: u32 = 800;

/// A proposed new school location computed upstream.
///
/// The backend does not evaluate these; they are normalized for drawing and
/// passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub location_id: Option<String>,
    pub location: Option<GeoPoint>,
    pub recommended_district: Option<String>,
    pub estimated_students_served: u32,
    pub recommended_capacity: u32,
    pub districts_served: Vec<String>,
    pub avg_distance_km: f64,
    pub priority: Option<String>,
    pub rationale: Option<String>,
    pub school_type: Option<String>,
    pub gender: Option<String>,
}
