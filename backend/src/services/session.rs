//! What-if sessions.
//!
//! A session pairs the what-if mode flag with one [`OverrideStore`]. Phases:
//!
//! ```text
//!   Off ──enable──► Armed ──set──► Editing
//!    ▲                │  ◄─reset all─┘ │
//!    └────disable─────┴────disable─────┘   (disable forces reset_all)
//! ```
//!
//! Edits while `Off` are ignored.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::overrides::{CapacityOverrides, OverrideStore};
use crate::api::SchoolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Off,
    Armed,
    Editing,
}

/// One operator's what-if state.
#[derive(Debug, Clone)]
pub struct WhatIfSession {
    id: Uuid,
    enabled: bool,
    store: OverrideStore,
    created_at: DateTime<Utc>,
    last_used_at: DateTime<Utc>,
}

impl WhatIfSession {
    pub fn new(known: Arc<HashSet<SchoolId>>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            enabled: false,
            store: OverrideStore::new(known),
            created_at: now,
            last_used_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.enabled, self.store.is_empty()) {
            (false, _) => SessionPhase::Off,
            (true, true) => SessionPhase::Armed,
            (true, false) => SessionPhase::Editing,
        }
    }

    /// Toggle what-if mode. Disabling drops every override; returns how many.
    pub fn set_what_if(&mut self, enabled: bool) -> usize {
        self.enabled = enabled;
        if enabled {
            0
        } else {
            self.store.reset_all()
        }
    }

    pub fn set_override(&mut self, school: &SchoolId, capacity: &Value) -> bool {
        if !self.enabled {
            debug!("Session {} is not in what-if mode; ignoring override", self.id);
            return false;
        }
        self.store.set_raw(school, capacity)
    }

    pub fn reset_override(&mut self, school: &SchoolId) -> bool {
        self.enabled && self.store.reset(school)
    }

    pub fn reset_all(&mut self) -> usize {
        self.store.reset_all()
    }

    pub fn overrides(&self) -> Arc<CapacityOverrides> {
        self.store.snapshot()
    }

    fn touch(&mut self) {
        self.last_used_at = Utc::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            phase: self.phase(),
            what_if_enabled: self.enabled,
            overrides: (*self.store.snapshot()).clone(),
            created_at: self.created_at,
            last_used_at: self.last_used_at,
        }
    }
}

/// Serializable view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: SessionPhase,
    pub what_if_enabled: bool,
    pub overrides: CapacityOverrides,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

/// Process-wide set of sessions, bounded by `max_sessions`.
///
/// When full, creating a session evicts the least recently used one.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, WhatIfSession>>>,
    known: Arc<RwLock<Arc<HashSet<SchoolId>>>>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, known: HashSet<SchoolId>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            known: Arc::new(RwLock::new(Arc::new(known))),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn create(&self) -> SessionSnapshot {
        let known = self.known.read().clone();
        let session = WhatIfSession::new(known);
        let snapshot = session.snapshot();

        let mut sessions = self.sessions.write();
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.last_used_at)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    debug!("Evicting idle session {}", id);
                    sessions.remove(&id);
                }
                None => break,
            }
        }
        sessions.insert(session.id, session);
        snapshot
    }

    /// Snapshot of a session. Counts as use for eviction.
    pub fn get(&self, id: &Uuid) -> Option<SessionSnapshot> {
        self.update(id, |session| session.snapshot())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Run `f` against a session under the write lock.
    pub fn update<R>(&self, id: &Uuid, f: impl FnOnce(&mut WhatIfSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(id)?;
        session.touch();
        Some(f(session))
    }

    /// Current override snapshot of a session; the lock is released on return.
    /// Counts as use for eviction, so an operator viewing the map stays alive.
    pub fn overrides(&self, id: &Uuid) -> Option<Arc<CapacityOverrides>> {
        self.update(id, |session| session.overrides())
    }

    /// Whether a session exists, without refreshing its eviction clock.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Install the school ids of a freshly loaded dataset and prune overrides
    /// that refer to vanished schools. Returns the number pruned.
    pub fn rebind(&self, known: HashSet<SchoolId>) -> usize {
        let known = Arc::new(known);
        *self.known.write() = Arc::clone(&known);
        let pruned: usize = self
            .sessions
            .write()
            .values_mut()
            .map(|session| session.store.rebind(Arc::clone(&known)))
            .sum();
        if pruned > 0 {
            info!("Pruned {} overrides for schools missing after reload", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
