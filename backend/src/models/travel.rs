use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// One point observation from the travel-time feed.
///
/// `location` is `None` when the row carried no usable coordinates; such a
/// sample still contributes its time to the district mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSample {
    pub district: String,
    pub location: Option<GeoPoint>,
    pub travel_time_minutes: f64,
}
