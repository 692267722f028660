//! HTTP handlers for the REST API.
//!
//! Handlers parse the request, take one dataset `Arc` and one override
//! snapshot, and delegate to the pure service functions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::dto::{
    DatasetSummary, HealthResponse, ImpactResponse, MapQuery, MapResponse, OverrideResponse,
    ReloadJobResponse, ReloadQuery, ResetResponse, SetOverrideRequest, WhatIfRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{SchoolId, SessionSnapshot, TierLegendEntry};
use crate::ingest::LoadReport;
use crate::models::Dataset;
use crate::services::job_tracker::ReloadJob;
use crate::services::{self, reload};

pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid session id: {}", raw)))
}

fn session_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Session {} not found", id))
}

fn summarize(dataset: &Dataset, report: Option<LoadReport>) -> DatasetSummary {
    DatasetSummary {
        fingerprint: dataset.fingerprint.clone(),
        loaded_at: dataset.loaded_at,
        schools: dataset.schools.len(),
        located_schools: dataset.schools.iter().filter(|s| s.location.is_some()).count(),
        travel_samples: dataset.samples.len(),
        candidate_sites: dataset.sites.len(),
        districts: services::aggregate_baseline(&dataset.samples).len(),
        insights: dataset.insights.clone(),
        report,
    }
}

// =============================================================================
// Health and dataset
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let dataset = state.dataset.current();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_fingerprint: dataset.fingerprint.clone(),
        dataset_loaded_at: dataset.loaded_at,
        sessions: state.sessions.len(),
    }))
}

/// GET /v1/dataset
pub async fn get_dataset(State(state): State<AppState>) -> HandlerResult<DatasetSummary> {
    let dataset = state.dataset.current();
    Ok(Json(summarize(&dataset, state.dataset.report())))
}

/// POST /v1/dataset/reload
///
/// Refetches every feed. With `?background=true` the reload runs as a job and
/// the response is 202 with the job id.
pub async fn reload_dataset(
    State(state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> Result<Response, AppError> {
    let region = state.config.simulation.region;

    if query.background {
        let job_id = state.jobs.create_job();
        tokio::spawn(reload::reload_dataset_job(
            job_id,
            state.jobs.clone(),
            state.source.clone(),
            region,
            state.dataset.clone(),
            state.sessions.clone(),
        ));
        tracing::info!(%job_id, "Started background reload");
        let body = ReloadJobResponse {
            job_id,
            message: format!("Reload started. Track progress at /v1/jobs/{}", job_id),
        };
        return Ok((StatusCode::ACCEPTED, Json(body)).into_response());
    }

    let report = reload::reload_dataset(
        state.source.as_ref(),
        &region,
        &state.dataset,
        &state.sessions,
    )
    .await?;
    let dataset = state.dataset.current();
    Ok(Json(summarize(&dataset, Some(report))).into_response())
}

/// GET /v1/jobs/{job_id}
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<ReloadJob> {
    let id = Uuid::parse_str(&job_id)
        .map_err(|_| AppError::BadRequest(format!("Invalid job id: {}", job_id)))?;
    state
        .jobs
        .get_job(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))
}

/// GET /v1/tiers
pub async fn get_tiers() -> HandlerResult<Vec<TierLegendEntry>> {
    Ok(Json(services::tier_legend()))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let session = state.sessions.create();
    tracing::debug!(session_id = %session.session_id, "Created session");
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<SessionSnapshot> {
    let id = parse_session_id(&session_id)?;
    state
        .sessions
        .get(&id)
        .map(Json)
        .ok_or_else(|| session_not_found(&id))
}

/// DELETE /v1/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&session_id)?;
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id))
    }
}

/// PUT /v1/sessions/{id}/what-if
///
/// Disabling what-if mode drops every override of the session.
pub async fn set_what_if(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<WhatIfRequest>,
) -> HandlerResult<SessionSnapshot> {
    let id = parse_session_id(&session_id)?;
    state
        .sessions
        .update(&id, |session| {
            session.set_what_if(request.enabled);
            session.snapshot()
        })
        .map(Json)
        .ok_or_else(|| session_not_found(&id))
}

/// PUT /v1/sessions/{id}/overrides/{school_id}
///
/// Invalid capacities are not an error: the store ignores them and the
/// response says `applied: false`.
pub async fn set_override(
    State(state): State<AppState>,
    Path((session_id, school_id)): Path<(String, String)>,
    Json(request): Json<SetOverrideRequest>,
) -> HandlerResult<OverrideResponse> {
    let id = parse_session_id(&session_id)?;
    let school = SchoolId::from(school_id);
    if state.dataset.current().find_school(&school).is_none() {
        return Err(AppError::NotFound(format!("School {} not found", school)));
    }

    let (applied, session) = state
        .sessions
        .update(&id, |session| {
            let applied = session.set_override(&school, &request.capacity);
            (applied, session.snapshot())
        })
        .ok_or_else(|| session_not_found(&id))?;

    tracing::debug!(session_id = %id, school_id = %school, applied, "Capacity override");
    Ok(Json(OverrideResponse { applied, session }))
}

/// DELETE /v1/sessions/{id}/overrides/{school_id}
pub async fn reset_override(
    State(state): State<AppState>,
    Path((session_id, school_id)): Path<(String, String)>,
) -> HandlerResult<ResetResponse> {
    let id = parse_session_id(&session_id)?;
    let school = SchoolId::from(school_id);
    state
        .sessions
        .update(&id, |session| ResetResponse {
            removed: usize::from(session.reset_override(&school)),
            session: session.snapshot(),
        })
        .map(Json)
        .ok_or_else(|| session_not_found(&id))
}

/// DELETE /v1/sessions/{id}/overrides
pub async fn reset_all_overrides(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ResetResponse> {
    let id = parse_session_id(&session_id)?;
    state
        .sessions
        .update(&id, |session| ResetResponse {
            removed: session.reset_all(),
            session: session.snapshot(),
        })
        .map(Json)
        .ok_or_else(|| session_not_found(&id))
}

// =============================================================================
// Views
// =============================================================================

/// GET /v1/sessions/{id}/map
pub async fn get_map(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<MapQuery>,
) -> HandlerResult<MapResponse> {
    let id = parse_session_id(&session_id)?;
    let criteria = query.criteria().map_err(AppError::BadRequest)?;
    let session = state.sessions.get(&id).ok_or_else(|| session_not_found(&id))?;

    let dataset = state.dataset.current();
    let view = services::compute_map_view(
        &dataset,
        &criteria,
        &session.overrides,
        &query.layers(),
        &state.config.simulation,
    );
    Ok(Json(MapResponse {
        session_id: id,
        phase: session.phase,
        view,
    }))
}

/// GET /v1/sessions/{id}/impact
pub async fn get_impact(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ImpactResponse> {
    let id = parse_session_id(&session_id)?;
    let session = state.sessions.get(&id).ok_or_else(|| session_not_found(&id))?;
    let dataset = state.dataset.current();
    Ok(Json(ImpactResponse {
        session_id: id,
        phase: session.phase,
        districts: services::compute_district_impact(&dataset.schools, &session.overrides),
    }))
}
