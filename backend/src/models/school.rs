use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::api::SchoolId;

/// Education stage served by a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchoolType {
    Elementary,
    Intermediate,
    High,
}

impl SchoolType {
    /// Case-insensitive parse that also accepts the common synonyms seen in
    /// upstream exports.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "elementary" | "primary" => Some(SchoolType::Elementary),
            "intermediate" | "middle" => Some(SchoolType::Intermediate),
            "high" | "secondary" => Some(SchoolType::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolType::Elementary => "Elementary",
            SchoolType::Intermediate => "Intermediate",
            SchoolType::High => "High",
        }
    }
}

/// Student body served by a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Boys,
    Girls,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "boys" | "boy" | "male" => Some(Gender::Boys),
            "girls" | "girl" | "female" => Some(Gender::Girls),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Boys => "Boys",
            Gender::Girls => "Girls",
        }
    }
}

/// A school as seen by the simulation core.
///
/// `capacity` is the observed design capacity. What-if edits never touch it;
/// they live in the override store and are resolved through
/// `CapacityOverrides::effective_capacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: SchoolId,
    pub name: String,
    pub district: String,
    pub school_type: Option<SchoolType>,
    pub gender: Option<Gender>,
    pub capacity: u32,
    pub enrollment: u32,
    pub location: Option<GeoPoint>,
}
