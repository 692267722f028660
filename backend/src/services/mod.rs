//! Service layer: the simulation core and the orchestration around it.
//!
//! Everything except [`session`], [`job_tracker`] and [`reload`] is a pure
//! function of (schools, samples, override snapshot).

pub mod distance;
pub mod district;
pub mod filter;
pub mod impact;
pub mod job_tracker;
pub mod map_view;
pub mod overrides;
pub mod recalculator;
pub mod reload;
pub mod session;
pub mod utilization;

pub use distance::{estimate_travel_minutes, haversine_km};
pub use district::aggregate_baseline;
pub use filter::filter_schools;
pub use impact::compute_district_impact;
pub use job_tracker::JobTracker;
pub use map_view::{compute_map_view, tier_legend};
pub use overrides::{CapacityOverrides, OverrideStore};
pub use recalculator::{recalculate, TravelPolicy};
pub use reload::{reload_dataset, DatasetHandle, ReloadError};
pub use session::{SessionRegistry, WhatIfSession};
pub use utilization::classify;
