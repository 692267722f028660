//! Request and response bodies of the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{
    DistrictImpact, FeedInsights, FilterCriteria, LayerToggles, LoadReport, MapView, SessionPhase,
    SessionSnapshot, TierToggles,
};
use crate::models::{Gender, SchoolType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dataset_fingerprint: String,
    pub dataset_loaded_at: DateTime<Utc>,
    pub sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub schools: usize,
    pub located_schools: usize,
    pub travel_samples: usize,
    pub candidate_sites: usize,
    pub districts: usize,
    pub insights: FeedInsights,
    pub report: Option<LoadReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReloadQuery {
    /// Run the reload as a background job and answer 202 right away.
    #[serde(default)]
    pub background: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadJobResponse {
    pub job_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfRequest {
    pub enabled: bool,
}

/// `capacity` stays untyped so malformed input reaches the override store,
/// which ignores it, instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOverrideRequest {
    #[serde(default)]
    pub capacity: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideResponse {
    /// Whether the store changed.
    pub applied: bool,
    pub session: SessionSnapshot,
}

/// Map query string. Every field is optional; omitted fields take the
/// dashboard's reset values.
///
/// `school_type` and `gender` accept `all` as well as a value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapQuery {
    pub utilization_min: Option<f64>,
    pub utilization_max: Option<f64>,
    pub school_type: Option<String>,
    pub gender: Option<String>,
    pub critical: Option<bool>,
    pub over_capacity: Option<bool>,
    pub near_capacity: Option<bool>,
    pub acceptable: Option<bool>,
    pub show_schools: Option<bool>,
    pub show_sites: Option<bool>,
    pub show_districts: Option<bool>,
}

impl MapQuery {
    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        let defaults = FilterCriteria::default();
        let tiers = TierToggles {
            critical: self.critical.unwrap_or(true),
            over_capacity: self.over_capacity.unwrap_or(true),
            near_capacity: self.near_capacity.unwrap_or(true),
            acceptable: self.acceptable.unwrap_or(true),
        };
        Ok(FilterCriteria {
            utilization_min: self.utilization_min.unwrap_or(defaults.utilization_min),
            utilization_max: self.utilization_max.unwrap_or(defaults.utilization_max),
            school_type: parse_choice(self.school_type.as_deref(), "school_type", SchoolType::parse)?,
            gender: parse_choice(self.gender.as_deref(), "gender", Gender::parse)?,
            tiers,
        })
    }

    pub fn layers(&self) -> LayerToggles {
        LayerToggles {
            schools: self.show_schools.unwrap_or(true),
            candidate_sites: self.show_sites.unwrap_or(true),
            districts: self.show_districts.unwrap_or(true),
        }
    }
}

fn parse_choice<T>(
    value: Option<&str>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => parse(v)
            .map(Some)
            .ok_or_else(|| format!("Unknown {}: {}", name, v)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub removed: usize,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapResponse {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    #[serde(flatten)]
    pub view: MapView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactResponse {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub districts: Vec<DistrictImpact>,
}
