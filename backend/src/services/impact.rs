//! Per-district capacity totals before and after overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::overrides::CapacityOverrides;
use super::recalculator::spare_seats;
use crate::models::SchoolRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictImpact {
    pub district: String,
    pub school_count: usize,
    pub original_capacity: u64,
    pub effective_capacity: u64,
    /// `effective_capacity - original_capacity`; negative when seats were removed.
    pub capacity_change: i64,
    pub enrollment: u64,
    /// Schools whose enrollment exceeds their effective capacity.
    pub overcrowded_schools: usize,
    /// District-wide utilization rounded to a whole percent, 0 without capacity.
    pub utilization_pct: u32,
    /// Students beyond the district's effective capacity.
    pub deficit: u64,
    /// Sum of per-school spare seats.
    pub spare_seats: u64,
}

impl DistrictImpact {
    fn empty(district: &str) -> Self {
        Self {
            district: district.to_string(),
            school_count: 0,
            original_capacity: 0,
            effective_capacity: 0,
            capacity_change: 0,
            enrollment: 0,
            overcrowded_schools: 0,
            utilization_pct: 0,
            deficit: 0,
            spare_seats: 0,
        }
    }
}

/// District impact table, ordered by district name.
pub fn compute_district_impact(
    schools: &[SchoolRecord],
    overrides: &CapacityOverrides,
) -> Vec<DistrictImpact> {
    let mut by_district: BTreeMap<&str, DistrictImpact> = BTreeMap::new();

    for school in schools {
        let effective = overrides.effective_capacity(&school.id, school.capacity);
        let entry = by_district
            .entry(school.district.as_str())
            .or_insert_with(|| DistrictImpact::empty(&school.district));

        entry.school_count += 1;
        entry.original_capacity += school.capacity as u64;
        entry.effective_capacity += effective as u64;
        entry.enrollment += school.enrollment as u64;
        entry.spare_seats += spare_seats(school, overrides) as u64;
        if school.enrollment > effective {
            entry.overcrowded_schools += 1;
        }
    }

    by_district
        .into_values()
        .map(|mut impact| {
            impact.capacity_change = impact.effective_capacity as i64 - impact.original_capacity as i64;
            impact.utilization_pct = if impact.effective_capacity > 0 {
                (impact.enrollment as f64 / impact.effective_capacity as f64 * 100.0).round() as u32
            } else {
                0
            };
            impact.deficit = impact.enrollment.saturating_sub(impact.effective_capacity);
            impact
        })
        .collect()
}
