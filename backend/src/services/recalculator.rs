//! Travel-Time Recalculator.
//!
//! Re-estimates district travel times under capacity overrides with a greedy
//! nearest-feasible-capacity search: a district with local spare seats gets the
//! local access time, any other district gets the distance-based estimate to
//! the closest school anywhere with spare seats, and if no such school exists
//! every such district gets the saturation fallback.
//!
//! The minute values are heuristics, not measurements, and are carried in
//! [`TravelPolicy`] so deployments can tune them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::distance::{distance_between, estimate_travel_minutes_with};
use super::district::DistrictAggregate;
use super::overrides::CapacityOverrides;
use crate::models::SchoolRecord;

/// Heuristic constants of the recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPolicy {
    /// Assigned to a district that has spare seats of its own.
    pub local_access_minutes: f64,
    /// Assigned when no school in the system has spare seats.
    pub saturation_fallback_minutes: f64,
    pub minutes_per_km: f64,
    /// Floor of the distance-based estimate.
    pub minimum_minutes: f64,
}

impl Default for TravelPolicy {
    fn default() -> Self {
        Self {
            local_access_minutes: 5.0,
            saturation_fallback_minutes: 30.0,
            minutes_per_km: super::distance::DEFAULT_MINUTES_PER_KM,
            minimum_minutes: super::distance::DEFAULT_MINIMUM_MINUTES,
        }
    }
}

impl TravelPolicy {
    pub fn estimate_minutes(&self, km: f64) -> f64 {
        estimate_travel_minutes_with(km, self.minutes_per_km, self.minimum_minutes)
    }

    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("local_access_minutes", self.local_access_minutes),
            ("saturation_fallback_minutes", self.saturation_fallback_minutes),
            ("minutes_per_km", self.minutes_per_km),
            ("minimum_minutes", self.minimum_minutes),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "simulation.travel.{} must be finite and >= 0, got {}",
                    name, value
                ));
            }
        }
        // Gaining local seats must never lengthen a district's time.
        if self.local_access_minutes > self.minimum_minutes {
            return Err(format!(
                "simulation.travel.local_access_minutes ({}) must not exceed minimum_minutes ({})",
                self.local_access_minutes, self.minimum_minutes
            ));
        }
        if self.saturation_fallback_minutes < self.local_access_minutes {
            return Err(format!(
                "simulation.travel.saturation_fallback_minutes ({}) must be at least local_access_minutes ({})",
                self.saturation_fallback_minutes, self.local_access_minutes
            ));
        }
        Ok(())
    }
}

/// `max(0, effective capacity - enrollment)`.
pub fn spare_seats(school: &SchoolRecord, overrides: &CapacityOverrides) -> u32 {
    overrides
        .effective_capacity(&school.id, school.capacity)
        .saturating_sub(school.enrollment)
}

/// Total spare seats per district.
pub fn district_spare_capacity<'a>(
    schools: &'a [SchoolRecord],
    overrides: &CapacityOverrides,
) -> HashMap<&'a str, u64> {
    let mut totals: HashMap<&'a str, u64> = HashMap::new();
    for school in schools {
        *totals.entry(school.district.as_str()).or_default() += spare_seats(school, overrides) as u64;
    }
    totals
}

/// Recalculated minutes for every district in `aggregates`.
///
/// Callers only need this while at least one override is active; without
/// overrides the baseline means stand.
pub fn recalculate(
    schools: &[SchoolRecord],
    overrides: &CapacityOverrides,
    aggregates: &BTreeMap<String, DistrictAggregate>,
    policy: &TravelPolicy,
) -> BTreeMap<String, f64> {
    let local = district_spare_capacity(schools, overrides);
    let with_spare: Vec<&SchoolRecord> = schools
        .iter()
        .filter(|s| spare_seats(s, overrides) > 0)
        .collect();

    aggregates
        .iter()
        .map(|(district, aggregate)| {
            let minutes = if local.get(district.as_str()).copied().unwrap_or(0) > 0 {
                policy.local_access_minutes
            } else {
                with_spare
                    .iter()
                    .filter_map(|s| s.location.as_ref())
                    .map(|location| distance_between(&aggregate.centroid, location))
                    .min_by(|a, b| a.total_cmp(b))
                    .map(|km| policy.estimate_minutes(km))
                    .unwrap_or(policy.saturation_fallback_minutes)
            };
            (district.clone(), minutes)
        })
        .collect()
}

/// Copy of `aggregates` with `recalculated_travel_time_minutes` filled in when
/// overrides are active, or cleared when they are not.
pub fn apply_recalculation(
    aggregates: &BTreeMap<String, DistrictAggregate>,
    schools: &[SchoolRecord],
    overrides: &CapacityOverrides,
    policy: &TravelPolicy,
) -> BTreeMap<String, DistrictAggregate> {
    let mut result = aggregates.clone();
    if overrides.is_empty() {
        for aggregate in result.values_mut() {
            aggregate.recalculated_travel_time_minutes = None;
        }
        return result;
    }
    let minutes = recalculate(schools, overrides, aggregates, policy);
    for (district, aggregate) in result.iter_mut() {
        aggregate.recalculated_travel_time_minutes = minutes.get(district).copied();
    }
    result
}

#[cfg(test)]
#[path = "recalculator_tests.rs"]
mod recalculator_tests;
