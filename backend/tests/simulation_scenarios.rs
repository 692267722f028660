mod support;

use serde_json::json;

use seatmap::api::{FilterCriteria, SchoolId, SeverityLevel, Tier};
use seatmap::config::SimulationConfig;
use seatmap::ingest::{build_dataset, RawFeeds};
use seatmap::models::BoundingBox;
use seatmap::services::map_view::{compute_map_view, LayerToggles};
use seatmap::services::session::{SessionPhase, WhatIfSession};
use seatmap::services::compute_district_impact;
use std::sync::Arc;

fn dataset() -> seatmap::models::Dataset {
    let raw = RawFeeds {
        capacity: support::capacity_payload(),
        sites: support::sites_payload(),
        travel: support::travel_payload(),
    };
    build_dataset(&raw, &BoundingBox::default()).0
}

fn district<'a>(
    view: &'a seatmap::api::MapView,
    name: &str,
) -> &'a seatmap::api::DistrictCircle {
    view.districts
        .iter()
        .find(|d| d.district == name)
        .unwrap_or_else(|| panic!("district {} missing", name))
}

#[test]
fn test_ingest_resolves_aliases() {
    let dataset = dataset();

    assert_eq!(dataset.schools.len(), 4);
    let b = dataset.find_school(&SchoolId::from("B")).unwrap();
    assert_eq!(b.district, "Olaya");
    assert_eq!(b.capacity, 800);
    assert_eq!(b.enrollment, 500);
    assert!(b.location.is_some());

    let outlier = dataset.find_school(&SchoolId::from("Z")).unwrap();
    assert!(outlier.location.is_none());

    assert_eq!(dataset.samples.len(), 4);
    assert_eq!(dataset.sites.len(), 1);
    assert_eq!(
        dataset.insights.travel_analysis,
        Some(json!({"summary": "Olaya is saturated"}))
    );
}

#[test]
fn test_baseline_map() {
    let dataset = dataset();
    let session = WhatIfSession::new(Arc::new(dataset.school_ids()));

    let view = compute_map_view(
        &dataset,
        &FilterCriteria::default(),
        &session.overrides(),
        &LayerToggles::default(),
        &SimulationConfig::default(),
    );

    assert_eq!(view.schools.len(), 3);
    assert_eq!(view.unlocated_matches, 1);
    assert_eq!(view.districts.len(), 2, "Nowhere has no located sample");

    let olaya = district(&view, "Olaya");
    assert_eq!(olaya.mean_travel_time_minutes, 22.0);
    assert_eq!(olaya.severity.level, SeverityLevel::High);

    let malaz = district(&view, "Malaz");
    assert_eq!(malaz.mean_travel_time_minutes, 14.0);
    assert_eq!(malaz.severity.level, SeverityLevel::Medium);
}

#[test]
fn test_what_if_session_end_to_end() {
    let dataset = dataset();
    let config = SimulationConfig::default();
    let mut session = WhatIfSession::new(Arc::new(dataset.school_ids()));
    let a = SchoolId::from("A");

    session.set_what_if(true);
    assert_eq!(session.phase(), SessionPhase::Armed);
    assert!(session.set_override(&a, &json!(700)));
    assert_eq!(session.phase(), SessionPhase::Editing);

    let view = compute_map_view(
        &dataset,
        &FilterCriteria::default(),
        &session.overrides(),
        &LayerToggles::default(),
        &config,
    );
    let marker = view.schools.iter().find(|s| s.id == a).unwrap();
    assert_eq!(marker.effective_capacity, 700);
    assert_eq!(marker.tier, Tier::NearCapacity);

    let olaya = district(&view, "Olaya");
    assert_eq!(olaya.recalculated_travel_time_minutes, Some(5.0));
    assert_eq!(olaya.severity.level, SeverityLevel::Good);

    // Malaz has no spare seats of its own; school B is ~4.4 km away.
    let malaz = district(&view, "Malaz");
    let minutes = malaz.recalculated_travel_time_minutes.unwrap();
    assert!(minutes > 12.0 && minutes < 15.0, "got {}", minutes);

    let impact = compute_district_impact(&dataset.schools, &session.overrides());
    let olaya_impact = impact.iter().find(|d| d.district == "Olaya").unwrap();
    assert_eq!(olaya_impact.capacity_change, 200);
    assert_eq!(olaya_impact.overcrowded_schools, 0);

    assert_eq!(session.set_what_if(false), 1);
    let view = compute_map_view(
        &dataset,
        &FilterCriteria::default(),
        &session.overrides(),
        &LayerToggles::default(),
        &config,
    );
    assert!(!view.recalculated);
    assert_eq!(district(&view, "Olaya").display_minutes, 22.0);
}

#[test]
fn test_saturated_system_falls_back() {
    let dataset = dataset();
    let mut session = WhatIfSession::new(Arc::new(dataset.school_ids()));
    session.set_what_if(true);
    session.set_override(&SchoolId::from("B"), &json!(500));

    let view = compute_map_view(
        &dataset,
        &FilterCriteria::default(),
        &session.overrides(),
        &LayerToggles::default(),
        &SimulationConfig::default(),
    );
    for circle in &view.districts {
        assert_eq!(circle.recalculated_travel_time_minutes, Some(30.0));
        assert_eq!(circle.severity.level, SeverityLevel::High);
    }
}

#[test]
fn test_filter_by_tier_and_gender() {
    let dataset = dataset();
    let criteria = FilterCriteria {
        gender: Some(seatmap::models::Gender::Boys),
        tiers: seatmap::api::TierToggles {
            acceptable: false,
            ..Default::default()
        },
        ..FilterCriteria::default()
    };
    let view = compute_map_view(
        &dataset,
        &criteria,
        &Default::default(),
        &LayerToggles::default(),
        &SimulationConfig::default(),
    );

    let ids: Vec<&str> = view.schools.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
}
