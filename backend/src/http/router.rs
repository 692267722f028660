//! Router configuration: routes and middleware.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are tiny; 1 MiB is generous.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // The dashboard is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Dataset
        .route("/dataset", get(handlers::get_dataset))
        .route("/dataset/reload", post(handlers::reload_dataset))
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/tiers", get(handlers::get_tiers))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{session_id}/what-if", put(handlers::set_what_if))
        .route(
            "/sessions/{session_id}/overrides",
            delete(handlers::reset_all_overrides),
        )
        .route(
            "/sessions/{session_id}/overrides/{school_id}",
            put(handlers::set_override).delete(handlers::reset_override),
        )
        // Views
        .route("/sessions/{session_id}/map", get(handlers::get_map))
        .route("/sessions/{session_id}/impact", get(handlers::get_impact));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
