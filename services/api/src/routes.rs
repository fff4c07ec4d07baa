use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use callboard::workflows::performance::{
    performance_router, ArchivePublisher, PerformanceService, PerformanceStore, StatusResult,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Ad-hoc scoring input. A missing target scores as "no target".
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreQuery {
    pub(crate) actual: f64,
    #[serde(default)]
    pub(crate) target: Option<f64>,
}

pub(crate) fn with_performance_routes<S, A>(service: Arc<PerformanceService<S, A>>) -> axum::Router
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    performance_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/performance/score",
            axum::routing::get(score_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<ScoreQuery>,
) -> Json<StatusResult> {
    let target = query.target.unwrap_or(0.0);
    Json(state.scoring.score(query.actual, target))
}
