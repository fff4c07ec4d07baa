use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::super::archive::ArchivePublisher;
use super::super::dashboard::{ParticipantDashboard, TeamSummary};
use super::service::{PerformanceService, SubmissionError, SubmissionReceipt, SubmissionRequest};
use super::store::PerformanceStore;
use crate::error::AppError;

/// Router builder exposing submission and dashboard endpoints.
pub fn performance_router<S, A>(service: Arc<PerformanceService<S, A>>) -> Router
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/performance/submissions",
            post(submit_handler::<S, A>),
        )
        .route(
            "/api/v1/performance/participants/:name",
            get(dashboard_handler::<S, A>),
        )
        .route("/api/v1/performance/summary", get(summary_handler::<S, A>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S, A>(
    State(service): State<Arc<PerformanceService<S, A>>>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError>
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    let Json(request) = payload?;
    let receipt = service.submit(request)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub(crate) async fn dashboard_handler<S, A>(
    State(service): State<Arc<PerformanceService<S, A>>>,
    Path(name): Path<String>,
) -> Result<Json<ParticipantDashboard>, AppError>
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    let dashboard = service
        .dashboard(&name)?
        .ok_or(SubmissionError::NoRecord(name))?;
    Ok(Json(dashboard))
}

pub(crate) async fn summary_handler<S, A>(
    State(service): State<Arc<PerformanceService<S, A>>>,
) -> Result<Json<TeamSummary>, AppError>
where
    S: PerformanceStore + 'static,
    A: ArchivePublisher + 'static,
{
    Ok(Json(service.summary()?))
}
