//! Capacity override store: the only mutable "what-if" state of the core.
//!
//! The store hands out immutable [`CapacityOverrides`] snapshots and replaces
//! its snapshot wholesale on every edit. Every derived view is a pure function
//! of (schools, samples, snapshot), so a reader holding a snapshot never sees a
//! half-applied edit.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::SchoolId;

/// Immutable school-id to hypothetical-capacity map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityOverrides {
    entries: BTreeMap<SchoolId, u32>,
}

impl CapacityOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &SchoolId) -> Option<u32> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &SchoolId) -> bool {
        self.entries.contains_key(id)
    }

    /// The override if one is active, else `original`.
    pub fn effective_capacity(&self, id: &SchoolId, original: u32) -> u32 {
        self.get(id).unwrap_or(original)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SchoolId, u32)> {
        self.entries.iter().map(|(id, capacity)| (id, *capacity))
    }

    /// Copy of this snapshot with one entry added or replaced.
    pub fn with(&self, id: SchoolId, capacity: u32) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(id, capacity);
        Self { entries }
    }

    /// Copy of this snapshot with one entry removed.
    pub fn without(&self, id: &SchoolId) -> Self {
        let mut entries = self.entries.clone();
        entries.remove(id);
        Self { entries }
    }
}

impl FromIterator<(SchoolId, u32)> for CapacityOverrides {
    fn from_iter<I: IntoIterator<Item = (SchoolId, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Validate user-supplied capacity input.
///
/// Accepts non-negative integers given as JSON numbers (`700`, `700.0`) or
/// numeric strings (`"700"`). Negative, fractional, non-numeric and
/// out-of-range input yields `None`.
pub fn parse_override_capacity(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            let v = n.as_f64()?;
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                Some(v as u32)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Mutable holder of the current override snapshot for one session.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    known: Arc<HashSet<SchoolId>>,
    current: Arc<CapacityOverrides>,
}

impl OverrideStore {
    /// Create an empty store accepting overrides for `known` schools only.
    pub fn new(known: Arc<HashSet<SchoolId>>) -> Self {
        Self {
            known,
            current: Arc::new(CapacityOverrides::new()),
        }
    }

    /// Register a hypothetical capacity. Unknown schools and negative values
    /// are ignored. Returns whether the store changed.
    pub fn set(&mut self, id: &SchoolId, new_capacity: i64) -> bool {
        if new_capacity < 0 || new_capacity > u32::MAX as i64 {
            debug!("Ignoring invalid capacity {} for school {}", new_capacity, id);
            return false;
        }
        self.apply(id, new_capacity as u32)
    }

    /// Like [`OverrideStore::set`] for raw JSON input.
    pub fn set_raw(&mut self, id: &SchoolId, input: &Value) -> bool {
        match parse_override_capacity(input) {
            Some(capacity) => self.apply(id, capacity),
            None => {
                debug!("Ignoring invalid capacity input {} for school {}", input, id);
                false
            }
        }
    }

    fn apply(&mut self, id: &SchoolId, capacity: u32) -> bool {
        if !self.known.contains(id) {
            debug!("Ignoring override for unknown school {}", id);
            return false;
        }
        if self.current.get(id) == Some(capacity) {
            return false;
        }
        self.current = Arc::new(self.current.with(id.clone(), capacity));
        true
    }

    /// Drop the override for one school. Returns whether one existed.
    pub fn reset(&mut self, id: &SchoolId) -> bool {
        if !self.current.contains(id) {
            return false;
        }
        self.current = Arc::new(self.current.without(id));
        true
    }

    /// Drop every override. Returns how many were removed.
    pub fn reset_all(&mut self) -> usize {
        let removed = self.current.len();
        if removed > 0 {
            self.current = Arc::new(CapacityOverrides::new());
        }
        removed
    }

    pub fn effective_capacity(&self, id: &SchoolId, original: u32) -> u32 {
        self.current.effective_capacity(id, original)
    }

    pub fn snapshot(&self) -> Arc<CapacityOverrides> {
        Arc::clone(&self.current)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Switch to a new set of known schools, pruning overrides for schools
    /// that no longer exist. Returns how many were pruned.
    pub fn rebind(&mut self, known: Arc<HashSet<SchoolId>>) -> usize {
        let kept: CapacityOverrides = self
            .current
            .iter()
            .filter(|(id, _)| known.contains(*id))
            .map(|(id, capacity)| (id.clone(), capacity))
            .collect();
        let pruned = self.current.len() - kept.len();
        self.known = known;
        if pruned > 0 {
            self.current = Arc::new(kept);
        }
        pruned
    }
}
