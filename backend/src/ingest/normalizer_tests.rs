use super::*;
use serde_json::json;

fn region() -> BoundingBox {
    BoundingBox::default()
}

#[test]
fn test_extract_coordinates_from_strings() {
    let point = extract_coordinates(&json!({"lat": "24.71", "lon": "46.67"}), &region()).unwrap();
    assert_eq!(point.lat, 24.71);
    assert_eq!(point.lon, 46.67);
}

#[test]
fn test_extract_coordinates_rejects_zero_sentinel() {
    assert!(extract_coordinates(&json!({"lat": 0, "lon": 0}), &region()).is_none());
}

#[test]
fn test_extract_coordinates_alias_priority() {
    let record = json!({
        "latitude": 24.8,
        "lat": 10.0,
        "x": 46.5,
        "center_lon": 99.0
    });
    let point = extract_coordinates(&record, &region()).unwrap();
    assert_eq!(point.lat, 24.8);
    assert_eq!(point.lon, 46.5);
}

#[test]
fn test_extract_coordinates_center_fields() {
    let record = json!({"center_lat": 24.6, "center_lon": 46.7});
    assert!(extract_coordinates(&record, &region()).is_some());
}

#[test]
fn test_extract_coordinates_first_present_wins_even_if_garbage() {
    let record = json!({"latitude": "north", "lat": 24.7, "lon": 46.7});
    assert!(extract_coordinates(&record, &region()).is_none());
}

#[test]
fn test_extract_coordinates_missing_axis() {
    assert!(extract_coordinates(&json!({"lat": 24.7}), &region()).is_none());
    assert!(extract_coordinates(&json!({"lat": 24.7, "lon": null}), &region()).is_none());
    assert!(extract_coordinates(&json!({}), &region()).is_none());
}

#[test]
fn test_extract_coordinates_rejects_non_numeric_types() {
    let record = json!({"lat": true, "lon": 46.7});
    assert!(extract_coordinates(&record, &region()).is_none());
    let record = json!({"lat": [24.7], "lon": 46.7});
    assert!(extract_coordinates(&record, &region()).is_none());
}

#[test]
fn test_extract_coordinates_custom_region() {
    let narrow = BoundingBox {
        lat_min: 24.0,
        lat_max: 25.0,
        lon_min: 46.0,
        lon_max: 47.0,
    };
    let record = json!({"lat": 23.5, "lon": 46.5});
    assert!(extract_coordinates(&record, &region()).is_some());
    assert!(extract_coordinates(&record, &narrow).is_none());
}

#[test]
fn test_parse_float_leading_prefix() {
    assert_eq!(parse_float(&json!("24.5abc")), Some(24.5));
    assert_eq!(parse_float(&json!("  -3.25 ")), Some(-3.25));
    assert_eq!(parse_float(&json!("1e2")), Some(100.0));
    assert_eq!(parse_float(&json!(".5")), Some(0.5));
    assert_eq!(parse_float(&json!("abc")), None);
    assert_eq!(parse_float(&json!("")), None);
    assert_eq!(parse_float(&json!("-")), None);
    assert_eq!(parse_float(&json!(null)), None);
}

#[test]
fn test_parse_count() {
    assert_eq!(parse_count(&json!(650)), Some(650));
    assert_eq!(parse_count(&json!(650.9)), Some(650));
    assert_eq!(parse_count(&json!("1200 seats")), Some(1200));
    assert_eq!(parse_count(&json!("12.9")), Some(12));
    assert_eq!(parse_count(&json!(-40)), Some(0));
    assert_eq!(parse_count(&json!("n/a")), None);
    assert_eq!(parse_count(&json!({"v": 1})), None);
}

#[test]
fn test_normalize_school_with_aliases() {
    let record = json!({
        "school_id": 17,
        "school_name": "Al Noor",
        "district_name": "Al Malaz",
        "school_type": "Intermediate",
        "gender": "Girls",
        "design_capacity": "800",
        "current_enrollment": 920,
        "Latitude": 24.66,
        "Longitude": 46.73
    });
    let school = normalize_school(&record, 0, &region());

    assert_eq!(school.id, SchoolId::new("17"));
    assert_eq!(school.name, "Al Noor");
    assert_eq!(school.district, "Al Malaz");
    assert_eq!(school.school_type, Some(SchoolType::Intermediate));
    assert_eq!(school.gender, Some(Gender::Girls));
    assert_eq!(school.capacity, 800);
    assert_eq!(school.enrollment, 920);
    assert_eq!(school.location, Some(GeoPoint::new(24.66, 46.73)));
}

#[test]
fn test_normalize_school_defaults() {
    let school = normalize_school(&json!({"capacity": "lots"}), 5, &region());

    assert_eq!(school.id, SchoolId::new("#5"));
    assert_eq!(school.name, "School");
    assert_eq!(school.district, UNKNOWN_DISTRICT);
    assert_eq!(school.school_type, None);
    assert_eq!(school.gender, None);
    assert_eq!(school.capacity, 0);
    assert_eq!(school.enrollment, 0);
    assert!(school.location.is_none());
}

#[test]
fn test_normalize_school_zero_capacity_falls_through() {
    let school = normalize_school(&json!({"id": "a", "capacity": 0, "design_capacity": 700}), 0, &region());
    assert_eq!(school.capacity, 700);
}

#[test]
fn test_normalize_sample() {
    let record = json!({
        "from_district": "Al Yasmin",
        "nearest_school_time": "14.5",
        "lat": 24.82,
        "lng": 46.64
    });
    let sample = normalize_sample(&record, &region()).unwrap();
    assert_eq!(sample.district, "Al Yasmin");
    assert_eq!(sample.travel_time_minutes, 14.5);
    assert!(sample.location.is_some());
}

#[test]
fn test_normalize_sample_time_alias_order() {
    let record = json!({
        "district": "D",
        "avg_travel_time_minutes": 0,
        "nearest_school_time": "bad",
        "travel_time": 22
    });
    let sample = normalize_sample(&record, &region()).unwrap();
    assert_eq!(sample.travel_time_minutes, 22.0);
    assert!(sample.location.is_none());
}

#[test]
fn test_normalize_sample_without_district_is_dropped() {
    assert!(normalize_sample(&json!({"time": 10, "lat": 24.7, "lon": 46.7}), &region()).is_none());
    assert!(normalize_sample(&json!({"district": "", "time": 10}), &region()).is_none());
}

#[test]
fn test_normalize_sample_negative_time_clamps() {
    let sample = normalize_sample(&json!({"district": "D", "time": -4}), &region()).unwrap();
    assert_eq!(sample.travel_time_minutes, 0.0);
}

#[test]
fn test_normalize_site_defaults_capacity() {
    let record = json!({
        "location_id": 3,
        "latitude": 24.9,
        "longitude": 46.6,
        "districts_served": ["A", "B", 7],
        "avg_distance_km": "2.4",
        "estimated_students_served": 1500
    });
    let site = normalize_site(&record, &region());
    assert_eq!(site.location_id.as_deref(), Some("3"));
    assert_eq!(site.recommended_capacity, DEFAULT_RECOMMENDED_CAPACITY);
    assert_eq!(site.districts_served, vec!["A", "B", "7"]);
    assert_eq!(site.avg_distance_km, 2.4);
    assert_eq!(site.estimated_students_served, 1500);
    assert!(site.location.is_some());
}
