//! # seatmap
//!
//! School-capacity what-if simulation engine behind the planning dashboard's
//! map view.
//!
//! The crate normalizes the raw school, travel-time and candidate-site feeds
//! supplied by the workflow endpoints, classifies schools by seat utilization,
//! aggregates travel samples into district circles, and lets an operator
//! change a school's capacity hypothetically and see district travel times and
//! utilization recomputed.
//!
//! ## Architecture
//!
//! - [`api`]: public DTOs and the [`api::SchoolId`] identifier
//! - [`models`]: typed records the core works on
//! - [`ingest`]: alias tables, coordinate validation, envelope unwrapping
//! - [`services`]: the simulation core, what-if sessions, dataset reloads
//! - [`upstream`]: feed sources (webhook with retry, fixtures) and the fan-out loader
//! - [`config`]: layered TOML + environment configuration
//! - [`http`]: axum REST API (feature `http-server`)
//!
//! Travel times produced by the recalculator are distance heuristics, not
//! routed or measured values.

pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod services;
pub mod upstream;

#[cfg(feature = "http-server")]
pub mod http;
