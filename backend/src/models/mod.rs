//! Typed domain records produced by the ingest layer.
//!
//! Everything in here is canonical: alias resolution and coordinate validation
//! already happened, so the services never touch raw JSON.

pub mod dataset;
pub mod geo;
pub mod school;
pub mod site;
pub mod travel;

pub use dataset::*;
pub use geo::*;
pub use school::*;
pub use site::*;
pub use travel::*;
