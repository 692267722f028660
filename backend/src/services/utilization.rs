//! Utilization classifier: seat utilization to a four-tier status and color.

use serde::{Deserialize, Serialize};

/// Seat-utilization status of a school.
///
/// Lower bounds are inclusive, upper bounds exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// ≥ 120 %
    Critical,
    /// [100, 120) %
    OverCapacity,
    /// [85, 100) %
    NearCapacity,
    /// < 85 %
    Acceptable,
}

pub const CRITICAL_THRESHOLD_PCT: f64 = 120.0;
pub const OVER_CAPACITY_THRESHOLD_PCT: f64 = 100.0;
pub const NEAR_CAPACITY_THRESHOLD_PCT: f64 = 85.0;

impl Tier {
    /// All tiers from most to least severe.
    pub const ALL: [Tier; 4] = [
        Tier::Critical,
        Tier::OverCapacity,
        Tier::NearCapacity,
        Tier::Acceptable,
    ];

    pub fn from_utilization(utilization_pct: f64) -> Self {
        if utilization_pct >= CRITICAL_THRESHOLD_PCT {
            Tier::Critical
        } else if utilization_pct >= OVER_CAPACITY_THRESHOLD_PCT {
            Tier::OverCapacity
        } else if utilization_pct >= NEAR_CAPACITY_THRESHOLD_PCT {
            Tier::NearCapacity
        } else {
            Tier::Acceptable
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Tier::Critical => "#dc2626",
            Tier::OverCapacity => "#f97316",
            Tier::NearCapacity => "#fbbf24",
            Tier::Acceptable => "#22c55e",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Critical => "Critical",
            Tier::OverCapacity => "Over capacity",
            Tier::NearCapacity => "Near capacity",
            Tier::Acceptable => "Acceptable",
        }
    }

    /// `[min, max)` utilization range of the tier; `None` means unbounded.
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Tier::Critical => (Some(CRITICAL_THRESHOLD_PCT), None),
            Tier::OverCapacity => (
                Some(OVER_CAPACITY_THRESHOLD_PCT),
                Some(CRITICAL_THRESHOLD_PCT),
            ),
            Tier::NearCapacity => (
                Some(NEAR_CAPACITY_THRESHOLD_PCT),
                Some(OVER_CAPACITY_THRESHOLD_PCT),
            ),
            Tier::Acceptable => (None, Some(NEAR_CAPACITY_THRESHOLD_PCT)),
        }
    }
}

/// Result of classifying one school.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub utilization_pct: f64,
    pub tier: Tier,
    pub color: &'static str,
}

/// `enrollment / capacity * 100`, or 0 when capacity is 0.
pub fn utilization_pct(enrollment: u32, effective_capacity: u32) -> f64 {
    if effective_capacity == 0 {
        return 0.0;
    }
    enrollment as f64 / effective_capacity as f64 * 100.0
}

pub fn classify(enrollment: u32, effective_capacity: u32) -> Classification {
    let utilization_pct = utilization_pct(enrollment, effective_capacity);
    let tier = Tier::from_utilization(utilization_pct);
    Classification {
        utilization_pct,
        tier,
        color: tier.color(),
    }
}
