//! Ordered field-name alias tables for upstream records.
//!
//! Upstream workflows rename fields between releases, so each canonical field
//! is resolved by probing a fixed list of names in priority order. The table is
//! consulted once per record at ingestion.

use serde_json::Value;

/// Ordered candidate names for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub field: &'static str,
    pub names: &'static [&'static str],
}

pub const LATITUDE: FieldAliases = FieldAliases {
    field: "latitude",
    names: &["latitude", "lat", "Latitude", "LAT", "y", "center_lat"],
};

pub const LONGITUDE: FieldAliases = FieldAliases {
    field: "longitude",
    names: &["longitude", "lng", "lon", "Longitude", "LON", "x", "center_lon"],
};

pub const SCHOOL_ID: FieldAliases = FieldAliases {
    field: "id",
    names: &["id", "school_id"],
};

pub const SCHOOL_NAME: FieldAliases = FieldAliases {
    field: "name",
    names: &["school_name", "name"],
};

pub const SCHOOL_DISTRICT: FieldAliases = FieldAliases {
    field: "district",
    names: &["district", "district_name"],
};

pub const SCHOOL_TYPE: FieldAliases = FieldAliases {
    field: "school_type",
    names: &["school_type", "type"],
};

pub const GENDER: FieldAliases = FieldAliases {
    field: "gender",
    names: &["gender"],
};

pub const CAPACITY: FieldAliases = FieldAliases {
    field: "capacity",
    names: &["capacity", "design_capacity"],
};

pub const ENROLLMENT: FieldAliases = FieldAliases {
    field: "enrollment",
    names: &["enrollment", "current_enrollment"],
};

pub const SAMPLE_DISTRICT: FieldAliases = FieldAliases {
    field: "district",
    names: &["district", "from_district", "district_name", "name"],
};

pub const TRAVEL_TIME: FieldAliases = FieldAliases {
    field: "travel_time_minutes",
    names: &[
        "avg_travel_time_minutes",
        "nearest_school_time",
        "travel_time",
        "time",
    ],
};

impl FieldAliases {
    /// First alias that is present and not `null`, regardless of its content.
    pub fn first_present<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.names
            .iter()
            .filter_map(|name| record.get(*name))
            .find(|value| !value.is_null())
    }

    /// First alias holding a "meaningful" value: not null, not `false`, not an
    /// empty or blank string and not numeric zero. Zero-valued aliases fall
    /// through to the next candidate.
    pub fn first_meaningful<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.names
            .iter()
            .filter_map(|name| record.get(*name))
            .find(|value| is_meaningful(value))
    }

    /// First meaningful alias rendered as trimmed text. Numbers are rendered
    /// in their JSON form so `7` and `"7"` yield the same string.
    pub fn first_text(&self, record: &Value) -> Option<String> {
        self.first_meaningful(record).and_then(|value| match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_present_respects_priority() {
        let record = json!({"lat": 24.1, "latitude": 24.9});
        assert_eq!(LATITUDE.first_present(&record), Some(&json!(24.9)));
    }

    #[test]
    fn test_first_present_skips_null() {
        let record = json!({"latitude": null, "lat": "24.5"});
        assert_eq!(LATITUDE.first_present(&record), Some(&json!("24.5")));
    }

    #[test]
    fn test_first_present_keeps_zero() {
        let record = json!({"latitude": 0, "lat": 24.5});
        assert_eq!(LATITUDE.first_present(&record), Some(&json!(0)));
    }

    #[test]
    fn test_first_meaningful_falls_through_zero_and_blank() {
        let record = json!({"capacity": 0, "design_capacity": 900});
        assert_eq!(CAPACITY.first_meaningful(&record), Some(&json!(900)));

        let record = json!({"district": "  ", "district_name": "Al Olaya"});
        assert_eq!(SCHOOL_DISTRICT.first_text(&record).as_deref(), Some("Al Olaya"));
    }

    #[test]
    fn test_first_text_renders_numbers() {
        let record = json!({"id": 42});
        assert_eq!(SCHOOL_ID.first_text(&record).as_deref(), Some("42"));
    }

    #[test]
    fn test_missing_everything() {
        let record = json!({"unrelated": 1});
        assert!(TRAVEL_TIME.first_meaningful(&record).is_none());
        assert!(LONGITUDE.first_present(&record).is_none());
    }
}
