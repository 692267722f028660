//! GeoRecord normalizer: turns loosely-typed upstream rows into canonical records.
//!
//! Nothing in here fails. Unusable coordinates become `None`, unusable counts
//! become `0`, and rows that cannot be keyed at all are dropped by the caller.

use log::debug;
use serde_json::Value;

use super::aliases::{self, FieldAliases};
use crate::api::SchoolId;
use crate::models::{
    BoundingBox, CandidateSite, Gender, GeoPoint, SchoolRecord, SchoolType, TravelSample,
    DEFAULT_RECOMMENDED_CAPACITY,
};

/// District label used for schools whose row names no district.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

/// Read `(lat, lon)` from a record with inconsistent field names.
///
/// Per axis, the first alias that is present and not null is parsed as a
/// float; later aliases are not consulted even if that parse fails. The point
/// is rejected when either axis does not parse or falls outside `region`.
pub fn extract_coordinates(record: &Value, region: &BoundingBox) -> Option<GeoPoint> {
    let lat = aliases::LATITUDE.first_present(record).and_then(parse_float)?;
    let lon = aliases::LONGITUDE.first_present(record).and_then(parse_float)?;

    if !region.contains(lat, lon) {
        debug!("Rejecting out-of-region point lat={} lon={}", lat, lon);
        return None;
    }
    Some(GeoPoint::new(lat, lon))
}

/// Lenient float parse: JSON numbers as-is, strings by their leading numeric
/// prefix (`"24.71 N"` reads as `24.71`). Non-finite results are rejected.
pub fn parse_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let text = s.trim();
            leading_numeric_prefix(text, true).and_then(|p| p.parse::<f64>().ok())
        }
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Lenient non-negative integer parse for seat and student counts.
///
/// Fractions truncate toward zero and negatives clamp to zero.
pub fn parse_count(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            leading_numeric_prefix(s.trim(), false).and_then(|p| p.parse::<f64>().ok())
        }
        _ => None,
    }?;
    if !raw.is_finite() {
        return None;
    }
    Some(raw.trunc().clamp(0.0, u32::MAX as f64) as u32)
}

fn leading_numeric_prefix(text: &str, allow_fraction: bool) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if allow_fraction {
        if end < bytes.len() && bytes[end] == b'.' {
            let mut cursor = end + 1;
            let frac_start = cursor;
            while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                cursor += 1;
            }
            if digits + (cursor - frac_start) > 0 {
                digits += cursor - frac_start;
                end = cursor;
            }
        }
        if digits > 0 && end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut cursor = end + 1;
            if cursor < bytes.len() && (bytes[cursor] == b'+' || bytes[cursor] == b'-') {
                cursor += 1;
            }
            let exp_start = cursor;
            while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                cursor += 1;
            }
            if cursor > exp_start {
                end = cursor;
            }
        }
    }

    if digits == 0 {
        return None;
    }
    Some(&text[..end])
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_field(record: &Value, field: &FieldAliases) -> u32 {
    field
        .first_meaningful(record)
        .and_then(parse_count)
        .unwrap_or(0)
}

/// Build a canonical school from one capacity-feed row.
///
/// `row` is the position in the feed; it keys schools that carry no id.
pub fn normalize_school(record: &Value, row: usize, region: &BoundingBox) -> SchoolRecord {
    let id = aliases::SCHOOL_ID
        .first_present(record)
        .and_then(text_of)
        .map(SchoolId::new)
        .unwrap_or_else(|| SchoolId::new(format!("#{}", row)));

    SchoolRecord {
        id,
        name: aliases::SCHOOL_NAME
            .first_text(record)
            .unwrap_or_else(|| "School".to_string()),
        district: aliases::SCHOOL_DISTRICT
            .first_text(record)
            .unwrap_or_else(|| UNKNOWN_DISTRICT.to_string()),
        school_type: aliases::SCHOOL_TYPE
            .first_text(record)
            .and_then(|t| SchoolType::parse(&t)),
        gender: aliases::GENDER
            .first_text(record)
            .and_then(|g| Gender::parse(&g)),
        capacity: count_field(record, &aliases::CAPACITY),
        enrollment: count_field(record, &aliases::ENROLLMENT),
        location: extract_coordinates(record, region),
    }
}

/// Build a travel sample from one travel-feed row.
///
/// Rows naming no district cannot be grouped and yield `None`. A missing or
/// unparsable time reads as zero minutes.
pub fn normalize_sample(record: &Value, region: &BoundingBox) -> Option<TravelSample> {
    let district = aliases::SAMPLE_DISTRICT.first_text(record)?;

    let travel_time_minutes = aliases::TRAVEL_TIME
        .names
        .iter()
        .filter_map(|name| record.get(*name))
        .filter_map(parse_float)
        .find(|minutes| *minutes != 0.0)
        .map(|minutes| minutes.max(0.0))
        .unwrap_or(0.0);

    Some(TravelSample {
        district,
        location: extract_coordinates(record, region),
        travel_time_minutes,
    })
}

/// Normalize a proposed-site row for pass-through.
pub fn normalize_site(record: &Value, region: &BoundingBox) -> CandidateSite {
    let text = |key: &str| record.get(key).and_then(text_of);

    let recommended_capacity = record
        .get("recommended_capacity")
        .and_then(parse_count)
        .filter(|c| *c > 0)
        .unwrap_or(DEFAULT_RECOMMENDED_CAPACITY);

    let districts_served = record
        .get("districts_served")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(text_of).collect())
        .unwrap_or_default();

    CandidateSite {
        location_id: text("location_id"),
        location: extract_coordinates(record, region),
        recommended_district: text("recommended_district"),
        estimated_students_served: record
            .get("estimated_students_served")
            .and_then(parse_count)
            .unwrap_or(0),
        recommended_capacity,
        districts_served,
        avg_distance_km: record
            .get("avg_distance_km")
            .and_then(parse_float)
            .unwrap_or(0.0),
        priority: text("priority"),
        rationale: text("rationale"),
        school_type: text("school_type"),
        gender: text("gender"),
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod normalizer_tests;
