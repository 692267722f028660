//! Map view composition.
//!
//! Builds every layer the dashboard map draws for one request from the loaded
//! dataset, the caller's filter and layer settings, and one override snapshot.

use serde::{Deserialize, Serialize};

use super::district::{aggregate_baseline, DistrictSeverity};
use super::filter::{filter_schools, FilterCriteria};
use super::overrides::CapacityOverrides;
use super::recalculator::apply_recalculation;
use super::utilization::{classify, Tier};
use crate::api::SchoolId;
use crate::config::SimulationConfig;
use crate::models::{CandidateSite, Dataset, Gender, GeoPoint, SchoolType};

/// Which layers to compute. Disabled layers come back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerToggles {
    pub schools: bool,
    pub candidate_sites: bool,
    pub districts: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            schools: true,
            candidate_sites: true,
            districts: true,
        }
    }
}

/// A drawable school with its classification under the active overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolMarker {
    pub id: SchoolId,
    pub name: String,
    pub district: String,
    pub school_type: Option<SchoolType>,
    pub gender: Option<Gender>,
    pub location: GeoPoint,
    pub original_capacity: u32,
    pub effective_capacity: u32,
    pub enrollment: u32,
    pub utilization_pct: f64,
    pub tier: Tier,
    pub color: &'static str,
    /// Students beyond effective capacity.
    pub deficit: u32,
    pub overridden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictCircle {
    pub district: String,
    pub centroid: GeoPoint,
    pub sample_count: usize,
    pub mean_travel_time_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recalculated_travel_time_minutes: Option<f64>,
    /// The value the circle is colored by.
    pub display_minutes: f64,
    pub severity: DistrictSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierLegendEntry {
    pub tier: Tier,
    pub label: &'static str,
    pub color: &'static str,
    /// Inclusive lower bound; `None` is unbounded.
    pub min_pct: Option<f64>,
    /// Exclusive upper bound; `None` is unbounded.
    pub max_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub schools: Vec<SchoolMarker>,
    /// Schools that passed the filter but have no usable location.
    pub unlocated_matches: usize,
    pub candidate_sites: Vec<CandidateSite>,
    pub districts: Vec<DistrictCircle>,
    /// Whether district times were recalculated against overrides.
    pub recalculated: bool,
    pub override_count: usize,
    pub dataset_fingerprint: String,
}

/// The four tiers, most severe first.
pub fn tier_legend() -> Vec<TierLegendEntry> {
    Tier::ALL
        .iter()
        .map(|tier| {
            let (min_pct, max_pct) = tier.range();
            TierLegendEntry {
                tier: *tier,
                label: tier.label(),
                color: tier.color(),
                min_pct,
                max_pct,
            }
        })
        .collect()
}

pub fn compute_map_view(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    overrides: &CapacityOverrides,
    layers: &LayerToggles,
    config: &SimulationConfig,
) -> MapView {
    let mut schools = Vec::new();
    let mut unlocated_matches = 0;
    if layers.schools {
        for school in filter_schools(&dataset.schools, criteria, overrides) {
            let Some(location) = school.location else {
                unlocated_matches += 1;
                continue;
            };
            let effective_capacity = overrides.effective_capacity(&school.id, school.capacity);
            let c = classify(school.enrollment, effective_capacity);
            schools.push(SchoolMarker {
                id: school.id.clone(),
                name: school.name.clone(),
                district: school.district.clone(),
                school_type: school.school_type,
                gender: school.gender,
                location,
                original_capacity: school.capacity,
                effective_capacity,
                enrollment: school.enrollment,
                utilization_pct: c.utilization_pct,
                tier: c.tier,
                color: c.color,
                deficit: school.enrollment.saturating_sub(effective_capacity),
                overridden: overrides.contains(&school.id),
            });
        }
    }

    let candidate_sites = if layers.candidate_sites {
        dataset
            .sites
            .iter()
            .filter(|site| site.location.is_some())
            .cloned()
            .collect()
    } else {
        vec![]
    };

    let districts = if layers.districts {
        let baseline = aggregate_baseline(&dataset.samples);
        apply_recalculation(&baseline, &dataset.schools, overrides, &config.travel)
            .into_values()
            .map(|aggregate| {
                let display_minutes = aggregate.display_minutes();
                DistrictCircle {
                    severity: config.severity.classify(display_minutes),
                    district: aggregate.district,
                    centroid: aggregate.centroid,
                    sample_count: aggregate.sample_count,
                    mean_travel_time_minutes: aggregate.mean_travel_time_minutes,
                    recalculated_travel_time_minutes: aggregate.recalculated_travel_time_minutes,
                    display_minutes,
                }
            })
            .collect()
    } else {
        vec![]
    };

    MapView {
        schools,
        unlocated_matches,
        candidate_sites,
        districts,
        recalculated: !overrides.is_empty(),
        override_count: overrides.len(),
        dataset_fingerprint: dataset.fingerprint.clone(),
    }
}

#[cfg(test)]
#[path = "map_view_tests.rs"]
mod map_view_tests;
