//! District Aggregator: point travel samples grouped into district circles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{GeoPoint, TravelSample};

/// Summary of all travel samples observed for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictAggregate {
    pub district: String,
    /// Mean of the located samples.
    pub centroid: GeoPoint,
    /// Samples counted toward the mean, located or not.
    pub sample_count: usize,
    pub located_sample_count: usize,
    pub mean_travel_time_minutes: f64,
    /// Set only while at least one capacity override is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recalculated_travel_time_minutes: Option<f64>,
}

impl DistrictAggregate {
    /// Recalculated time when present, else the observed mean.
    pub fn display_minutes(&self) -> f64 {
        self.recalculated_travel_time_minutes
            .unwrap_or(self.mean_travel_time_minutes)
    }
}

/// Group samples by district. Districts without a single located sample are
/// absent from the result.
pub fn aggregate_baseline(samples: &[TravelSample]) -> BTreeMap<String, DistrictAggregate> {
    struct Acc<'a> {
        total_minutes: f64,
        count: usize,
        located: Vec<&'a GeoPoint>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for sample in samples {
        let acc = groups.entry(sample.district.as_str()).or_insert(Acc {
            total_minutes: 0.0,
            count: 0,
            located: Vec::new(),
        });
        acc.total_minutes += sample.travel_time_minutes;
        acc.count += 1;
        if let Some(location) = &sample.location {
            acc.located.push(location);
        }
    }

    groups
        .into_iter()
        .filter_map(|(district, acc)| {
            let centroid = GeoPoint::centroid(acc.located.iter().copied())?;
            Some((
                district.to_string(),
                DistrictAggregate {
                    district: district.to_string(),
                    centroid,
                    sample_count: acc.count,
                    located_sample_count: acc.located.len(),
                    mean_travel_time_minutes: acc.total_minutes / acc.count as f64,
                    recalculated_travel_time_minutes: None,
                },
            ))
        })
        .collect()
}

/// Accessibility band of a district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    High,
    Medium,
    Good,
}

impl SeverityLevel {
    pub fn color(&self) -> &'static str {
        match self {
            SeverityLevel::High => "#ef4444",
            SeverityLevel::Medium => "#f97316",
            SeverityLevel::Good => "#22c55e",
        }
    }

    pub fn fill_opacity(&self) -> f64 {
        match self {
            SeverityLevel::High => 0.30,
            SeverityLevel::Medium => 0.25,
            SeverityLevel::Good => 0.20,
        }
    }
}

/// Display attributes of a district circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistrictSeverity {
    pub level: SeverityLevel,
    pub color: &'static str,
    pub fill_opacity: f64,
}

impl From<SeverityLevel> for DistrictSeverity {
    fn from(level: SeverityLevel) -> Self {
        Self {
            level,
            color: level.color(),
            fill_opacity: level.fill_opacity(),
        }
    }
}

/// Minute thresholds of the district bands. Both bounds are exclusive:
/// exactly 20 minutes is still `Medium`, exactly 10 still `Good`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub high_above_minutes: f64,
    pub medium_above_minutes: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            high_above_minutes: 20.0,
            medium_above_minutes: 10.0,
        }
    }
}

impl SeverityThresholds {
    pub fn level(&self, minutes: f64) -> SeverityLevel {
        if minutes > self.high_above_minutes {
            SeverityLevel::High
        } else if minutes > self.medium_above_minutes {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Good
        }
    }

    pub fn classify(&self, minutes: f64) -> DistrictSeverity {
        self.level(minutes).into()
    }

    pub fn validate(&self) -> Result<(), String> {
        let finite = self.high_above_minutes.is_finite() && self.medium_above_minutes.is_finite();
        if !finite || self.medium_above_minutes < 0.0 {
            return Err("simulation.severity thresholds must be finite and >= 0".to_string());
        }
        if self.medium_above_minutes > self.high_above_minutes {
            return Err(
                "simulation.severity.medium_above_minutes must not exceed high_above_minutes"
                    .to_string(),
            );
        }
        Ok(())
    }
}
