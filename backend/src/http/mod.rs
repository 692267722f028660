//! HTTP server for the seatmap backend.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  axum handlers                             │
//! │  request parsing, JSON, CORS, compression  │
//! └──────────────────┬─────────────────────────┘
//!                    │ one Arc<Dataset> + one override snapshot
//! ┌──────────────────▼─────────────────────────┐
//! │  services (pure simulation core)           │
//! └──────────────────┬─────────────────────────┘
//!                    │ reload
//! ┌──────────────────▼─────────────────────────┐
//! │  upstream (webhook / fixtures)             │
//! └────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
