//! Great-circle distance and the distance-to-time heuristic.
//!
//! The travel-time estimate is an approximation standing in for a routing
//! engine: a fixed urban speed with a floor for local access. It is not
//! measured ground truth and should never be presented as such.

use crate::models::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minutes per kilometre at the assumed ~20 km/h urban arterial speed.
pub const DEFAULT_MINUTES_PER_KM: f64 = 3.0;

/// Floor representing minimum local access time.
pub const DEFAULT_MINIMUM_MINUTES: f64 = 5.0;

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn distance_between(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km(a.lat, a.lon, b.lat, b.lon)
}

/// Estimated travel minutes for a straight-line distance: `max(5, km * 3)`.
pub fn estimate_travel_minutes(km: f64) -> f64 {
    estimate_travel_minutes_with(km, DEFAULT_MINUTES_PER_KM, DEFAULT_MINIMUM_MINUTES)
}

/// Same heuristic with explicit speed and floor.
pub fn estimate_travel_minutes_with(km: f64, minutes_per_km: f64, minimum_minutes: f64) -> f64 {
    (km * minutes_per_km).max(minimum_minutes)
}
