use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

use crate::workflows::performance::domain::ResubmissionPolicy;
use crate::workflows::performance::submission::performance_router;

fn submission(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/performance/submissions")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn submit_returns_created_receipt() {
    let (service, _store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(submission(json!({
            "name": "Bayan",
            "calls": 140,
            "bookings": 21,
            "attendance": 11,
            "leads": 50
        })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["record"]["callsDaily"], 140);
    assert_eq!(body["archive"]["action"], "insertData");
    assert_eq!(body["archive"]["conversionRate"], "42.00%");
    assert_eq!(body["dailyStatus"]["tier"], "GREEN");
    assert_eq!(body["archiveTriggered"], false);
}

#[tokio::test]
async fn negative_counts_are_unprocessable() {
    let (service, store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(submission(json!({ "name": "Bayan", "calls": -1 })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "calls must be a whole number from 0 to 1000000 (got -1)"
    );
    assert_eq!(store.upsert_count(), 0);
}

#[tokio::test]
async fn non_numeric_counts_get_a_json_validation_error() {
    let (service, store, archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(submission(json!({ "name": "Bayan", "calls": "abc" })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "calls must be a whole number from 0 to 1000000 (got abc)"
    );
    assert_eq!(store.upsert_count(), 0);
    assert!(archive.rows().is_empty());
}

#[tokio::test]
async fn form_strings_are_parsed_as_counts() {
    let (service, store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(submission(json!({
            "name": "Sahar",
            "calls": "140",
            "bookings": "21",
            "attendance": "",
            "leads": null
        })))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let record = store.get("Sahar").expect("stored");
    assert_eq!(record.calls_daily, 140);
    assert_eq!(record.bookings_daily, 21);
    assert_eq!(record.attendance_daily, 0);
    assert_eq!(record.daily_leads, 0);
}

#[tokio::test]
async fn malformed_bodies_get_a_json_error() {
    let (service, store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/performance/submissions")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": \"Bayan\""))
        .expect("request");
    let response = router.oneshot(request).await.expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].is_string());
    assert_eq!(store.upsert_count(), 0);
}

#[tokio::test]
async fn second_entry_on_the_same_day_conflicts() {
    let (service, _store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));
    let body = json!({ "name": "Salma", "calls": 100 });

    let first = router
        .clone()
        .oneshot(submission(body.clone()))
        .await
        .expect("route responds");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(submission(body))
        .await
        .expect("route responds");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_participant_is_not_found() {
    let (service, _store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(submission(json!({ "name": "Omar", "calls": 10 })))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_without_record_is_not_found() {
    let (service, _store, _archive) =
        build_service(MemoryStore::at(at(2025, 3, 12, 9)), ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/performance/participants/Sahar"))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "no performance record for 'Sahar'");
}

#[tokio::test]
async fn dashboard_and_summary_render_stored_records() {
    let store = MemoryStore::at(at(2025, 3, 12, 9));
    let mut record = stored("Sahar", at(2025, 3, 12, 8));
    record.calls_daily = 100;
    record.calls_weekly = 300;
    store.seed(record);
    let (service, _store, _archive) = build_service(store, ResubmissionPolicy::default());
    let router = performance_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(get("/api/v1/performance/participants/Sahar"))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["name"], "Sahar");
    assert_eq!(body["indicators"][0]["title"], "Daily Calls");
    assert_eq!(body["indicators"][0]["gauge_percent"], 71);
    assert_eq!(body["indicators"][0]["status"]["tier"], "YELLOW");

    let response = router
        .oneshot(get("/api/v1/performance/summary"))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["rows"][0]["name"], "Sahar");
    assert_eq!(body["rows"][0]["calls"]["display"], "100");
    assert_eq!(body["targets"]["calls"], 140);
}
