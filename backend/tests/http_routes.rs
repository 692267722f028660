#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use seatmap::config::AppConfig;
use seatmap::http::{create_router, AppState};
use seatmap::services::DatasetHandle;
use seatmap::upstream::StaticSource;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn app_with(source: StaticSource) -> Router {
    create_router(AppState::new(
        AppConfig::default(),
        Arc::new(source),
        DatasetHandle::empty(),
    ))
}

async fn loaded_app() -> Router {
    let app = app_with(support::fixture_source());
    let (status, _) = send(&app, Method::POST, "/v1/dataset/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    app
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_dataset_summary() {
    let app = loaded_app().await;

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["dataset_fingerprint"].as_str().unwrap().len(), 64);

    let (status, summary) = send(&app, Method::GET, "/v1/dataset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["schools"], 4);
    assert_eq!(summary["located_schools"], 3);
    assert_eq!(summary["districts"], 2);
    assert_eq!(summary["report"]["feeds"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_reload_with_no_feeds_is_bad_gateway() {
    let app = app_with(StaticSource::new());
    let (status, body) = send(&app, Method::POST, "/v1/dataset/reload", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_background_reload_job() {
    let app = app_with(support::fixture_source());
    let (status, body) = send(&app, Method::POST, "/v1/dataset/reload?background=true", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let job_uri = format!("/v1/jobs/{}", body["job_id"].as_str().unwrap());

    let mut job = Value::Null;
    for _ in 0..50 {
        let (status, body) = send(&app, Method::GET, &job_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        job = body;
        if job["status"] != "running" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(job["status"], "completed");

    let (status, _) = send(&app, Method::GET, "/v1/jobs/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tier_legend() {
    let app = app_with(StaticSource::new());
    let (status, body) = send(&app, Method::GET, "/v1/tiers", None).await;
    assert_eq!(status, StatusCode::OK);
    let tiers = body.as_array().unwrap();
    assert_eq!(tiers.len(), 4);
    assert_eq!(tiers[0]["tier"], "critical");
    assert_eq!(tiers[0]["color"], "#dc2626");
}

#[tokio::test]
async fn test_what_if_flow() {
    let app = loaded_app().await;
    let id = new_session(&app).await;

    // Off: overrides are ignored.
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/overrides/A", id),
        Some(json!({"capacity": 700})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], false);

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/what-if", id),
        Some(json!({"enabled": true})),
    )
    .await;
    assert_eq!(body["phase"], "armed");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/overrides/A", id),
        Some(json!({"capacity": "abc"})),
    )
    .await;
    assert_eq!(body["applied"], false);
    assert_eq!(body["session"]["phase"], "armed");

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/overrides/A", id),
        Some(json!({"capacity": 700})),
    )
    .await;
    assert_eq!(body["applied"], true);
    assert_eq!(body["session"]["phase"], "editing");
    assert_eq!(body["session"]["overrides"]["A"], 700);

    let (status, map) = send(&app, Method::GET, &format!("/v1/sessions/{}/map", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(map["recalculated"], true);
    let olaya = map["districts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["district"] == "Olaya")
        .unwrap();
    assert_eq!(olaya["recalculated_travel_time_minutes"], 5.0);

    let (_, impact) = send(&app, Method::GET, &format!("/v1/sessions/{}/impact", id), None).await;
    let olaya = impact["districts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["district"] == "Olaya")
        .unwrap();
    assert_eq!(olaya["capacity_change"], 200);

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/what-if", id),
        Some(json!({"enabled": false})),
    )
    .await;
    assert_eq!(body["phase"], "off");
    assert!(body["overrides"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_endpoints() {
    let app = loaded_app().await;
    let id = new_session(&app).await;
    send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/what-if", id),
        Some(json!({"enabled": true})),
    )
    .await;
    for (school, capacity) in [("A", 700), ("B", 900), ("C", 600)] {
        send(
            &app,
            Method::PUT,
            &format!("/v1/sessions/{}/overrides/{}", id, school),
            Some(json!({"capacity": capacity})),
        )
        .await;
    }

    let (status, body) = send(&app, Method::DELETE, &format!("/v1/sessions/{}/overrides/B", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 1);

    let (_, body) = send(&app, Method::DELETE, &format!("/v1/sessions/{}/overrides", id), None).await;
    assert_eq!(body["removed"], 2);
    assert_eq!(body["session"]["phase"], "armed");
}

#[tokio::test]
async fn test_map_query_filters() {
    let app = loaded_app().await;
    let id = new_session(&app).await;

    let uri = format!(
        "/v1/sessions/{}/map?gender=boys&acceptable=false&show_sites=false&show_districts=false",
        id
    );
    let (status, map) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = map["schools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A", "C"]);
    assert!(map["candidate_sites"].as_array().unwrap().is_empty());
    assert!(map["districts"].as_array().unwrap().is_empty());

    let uri = format!("/v1/sessions/{}/map?school_type=university", id);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_not_found_cases() {
    let app = loaded_app().await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(&app, Method::GET, &format!("/v1/sessions/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::GET, "/v1/sessions/nope/map", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = new_session(&app).await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/v1/sessions/{}/overrides/UNKNOWN", id),
        Some(json!({"capacity": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &format!("/v1/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
