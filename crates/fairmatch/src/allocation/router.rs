use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::repository::{AllocationRunRepository, RepositoryError, RunId};
use super::service::{
    AllocationRequest, AllocationService, AllocationServiceError, PreviewRequest,
};

/// Router builder exposing HTTP endpoints for allocation runs, reports, and previews.
pub fn allocation_router<R>(service: Arc<AllocationService<R>>) -> Router
where
    R: AllocationRunRepository + 'static,
{
    Router::new()
        .route("/api/v1/allocations", post(run_handler::<R>))
        .route("/api/v1/allocations/preview", post(preview_handler::<R>))
        .route("/api/v1/allocations/:run_id", get(run_status_handler::<R>))
        .route(
            "/api/v1/allocations/:run_id/report",
            get(report_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn run_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response
where
    R: AllocationRunRepository + 'static,
{
    match service.run(request) {
        Ok(run) => (StatusCode::CREATED, axum::Json(run.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn run_status_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: AllocationRunRepository + 'static,
{
    let id = RunId(run_id);
    match service.get(&id) {
        Ok(run) => (StatusCode::OK, axum::Json(run.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    Path(run_id): Path<String>,
) -> Response
where
    R: AllocationRunRepository + 'static,
{
    let id = RunId(run_id);
    match service.report(&id, Utc::now()) {
        Ok(report) => {
            let disposition = format!("attachment; filename=\"{}\"", report.file_name());
            (
                StatusCode::OK,
                [(header::CONTENT_DISPOSITION, disposition)],
                axum::Json(report),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    R: AllocationRunRepository + 'static,
{
    match service.preview(request) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let status = match &error {
        AllocationServiceError::Allocation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AllocationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AllocationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AllocationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
