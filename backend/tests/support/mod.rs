#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::{json, Value};

use seatmap::ingest::Feed;
use seatmap::upstream::StaticSource;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified, restoring them
/// afterwards even on panic. Calls are serialized because the environment is
/// process-global.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Capacity feed shaped like the school-analysis workflow output, using a
/// mix of field aliases.
pub fn capacity_payload() -> Value {
    json!({
        "overcapacity_schools": [
            {
                "school_id": "A",
                "school_name": "Al Olaya Boys Elementary",
                "district": "Olaya",
                "school_type": "Elementary",
                "gender": "Boys",
                "capacity": 500,
                "enrollment": 600,
                "latitude": "24.7",
                "longitude": "46.7"
            },
            {
                "id": "B",
                "name": "Olaya Girls Intermediate",
                "district_name": "Olaya",
                "type": "Intermediate",
                "gender": "Girls",
                "design_capacity": "800",
                "current_enrollment": 500,
                "lat": 24.7,
                "lng": 46.7396
            },
            {
                "id": "C",
                "school_name": "Malaz High",
                "district": "Malaz",
                "school_type": "High",
                "gender": "Boys",
                "capacity": 400,
                "enrollment": 520,
                "Latitude": 24.66,
                "Longitude": 46.74
            },
            {
                "id": "Z",
                "school_name": "Outlier",
                "district": "Malaz",
                "capacity": 100,
                "enrollment": 150,
                "lat": 0,
                "lon": 0
            }
        ]
    })
}

pub fn travel_payload() -> Value {
    json!({
        "heatmap_data": [
            {"district": "Olaya", "avg_travel_time_minutes": 20, "lat": 24.7, "lon": 46.7},
            {"district": "Olaya", "avg_travel_time_minutes": 24, "lat": 24.7, "lon": 46.7},
            {"from_district": "Malaz", "travel_time": "14", "center_lat": 24.66, "center_lon": 46.74},
            {"district": "Nowhere", "time": 40}
        ],
        "ai_insights": {"summary": "Olaya is saturated"}
    })
}

pub fn sites_payload() -> Value {
    json!({
        "recommendations": [
            {
                "location_id": "NEW-1",
                "latitude": 24.75,
                "longitude": 46.65,
                "recommended_district": "Olaya",
                "estimated_students_served": 420,
                "priority": "high"
            }
        ]
    })
}

pub fn fixture_source() -> StaticSource {
    StaticSource::new()
        .with_feed(Feed::Capacity, capacity_payload())
        .with_feed(Feed::TravelTimes, travel_payload())
        .with_feed(Feed::CandidateSites, sites_payload())
}
