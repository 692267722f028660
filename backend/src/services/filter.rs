//! School Filter: conjunctive predicate over utilization, type, gender and tier.

use serde::{Deserialize, Serialize};

use super::overrides::CapacityOverrides;
use super::utilization::{classify, Tier};
use crate::models::{Gender, SchoolRecord, SchoolType};

/// Which tiers are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierToggles {
    pub critical: bool,
    pub over_capacity: bool,
    pub near_capacity: bool,
    pub acceptable: bool,
}

impl Default for TierToggles {
    fn default() -> Self {
        Self {
            critical: true,
            over_capacity: true,
            near_capacity: true,
            acceptable: true,
        }
    }
}

impl TierToggles {
    pub fn is_enabled(&self, tier: Tier) -> bool {
        match tier {
            Tier::Critical => self.critical,
            Tier::OverCapacity => self.over_capacity,
            Tier::NearCapacity => self.near_capacity,
            Tier::Acceptable => self.acceptable,
        }
    }
}

/// Filter settings of the school layer.
///
/// `None` for `school_type` or `gender` means "all". The default is the
/// dashboard's reset state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub utilization_min: f64,
    pub utilization_max: f64,
    pub school_type: Option<SchoolType>,
    pub gender: Option<Gender>,
    pub tiers: TierToggles,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            utilization_min: 0.0,
            utilization_max: 200.0,
            school_type: None,
            gender: None,
            tiers: TierToggles::default(),
        }
    }
}

impl FilterCriteria {
    /// Whether a school with the given utilization passes every condition.
    /// Utilization bounds are inclusive.
    pub fn matches(&self, school: &SchoolRecord, utilization_pct: f64, tier: Tier) -> bool {
        if utilization_pct < self.utilization_min || utilization_pct > self.utilization_max {
            return false;
        }
        if let Some(wanted) = self.school_type {
            if school.school_type != Some(wanted) {
                return false;
            }
        }
        if let Some(wanted) = self.gender {
            if school.gender != Some(wanted) {
                return false;
            }
        }
        self.tiers.is_enabled(tier)
    }
}

/// Keep the schools that pass `criteria`, judged against their effective
/// capacity under `overrides`. Input order is preserved.
pub fn filter_schools<'a>(
    schools: &'a [SchoolRecord],
    criteria: &FilterCriteria,
    overrides: &CapacityOverrides,
) -> Vec<&'a SchoolRecord> {
    schools
        .iter()
        .filter(|school| {
            let capacity = overrides.effective_capacity(&school.id, school.capacity);
            let c = classify(school.enrollment, capacity);
            criteria.matches(school, c.utilization_pct, c.tier)
        })
        .collect()
}
