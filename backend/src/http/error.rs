//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::ReloadError;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug)]
pub enum AppError {
    /// Unknown session, job or school.
    NotFound(String),
    /// Malformed path or query.
    BadRequest(String),
    /// A reload where no feed could be fetched.
    Upstream(ReloadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Upstream(err) => {
                let failed: Vec<String> = err
                    .report()
                    .feeds
                    .iter()
                    .filter_map(|r| r.failure.as_ref().map(|f| format!("{}: {}", r.feed, f.message)))
                    .collect();
                (
                    StatusCode::BAD_GATEWAY,
                    ApiError::new("UPSTREAM_ERROR", err.to_string()).with_details(failed.join("; ")),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ReloadError> for AppError {
    fn from(err: ReloadError) -> Self {
        AppError::Upstream(err)
    }
}
