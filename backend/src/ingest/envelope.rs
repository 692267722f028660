//! Unwrap the record arrays from upstream response envelopes.
//!
//! Each workflow has shipped its rows under different keys over time. The
//! first listed path holding an array wins; anything else reads as no rows.

use serde_json::Value;

const SCHOOL_PATHS: &[&[&str]] = &[&["overcapacity_schools"], &["results", "schools"], &["schools"]];
const SITE_PATHS: &[&[&str]] = &[&["recommendations"], &["results", "optimal_locations"]];
const TRAVEL_PATHS: &[&[&str]] = &[
    &["district_analysis"],
    &["heatmap_data"],
    &["results", "heatmap_data"],
];

fn first_array<'a>(payload: &'a Value, paths: &[&[&str]]) -> &'a [Value] {
    if let Value::Array(rows) = payload {
        return rows;
    }
    paths
        .iter()
        .find_map(|path| {
            path.iter()
                .try_fold(payload, |node, key| node.get(*key))
                .and_then(Value::as_array)
        })
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn school_rows(payload: &Value) -> &[Value] {
    first_array(payload, SCHOOL_PATHS)
}

pub fn site_rows(payload: &Value) -> &[Value] {
    first_array(payload, SITE_PATHS)
}

pub fn travel_rows(payload: &Value) -> &[Value] {
    first_array(payload, TRAVEL_PATHS)
}

/// The optional `ai_insights` block some workflows attach.
pub fn insights(payload: &Value) -> Option<Value> {
    payload.get("ai_insights").filter(|v| !v.is_null()).cloned()
}
