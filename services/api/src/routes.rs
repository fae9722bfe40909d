use crate::infra::{deserialize_optional_date, report_timestamp, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use fairmatch::allocation::{
    allocation_router, AllocationConfig, AllocationError, AllocationReport, AllocationResult,
    AllocationRunRepository, AllocationService, Student,
};
use fairmatch::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Previously committed results to summarize without storing a run.
#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    pub(crate) results: Vec<AllocationResult>,
    pub(crate) students: Vec<Student>,
    #[serde(default)]
    pub(crate) config: Option<AllocationConfig>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) report_date: Option<NaiveDate>,
}

pub(crate) fn with_allocation_routes<R>(service: Arc<AllocationService<R>>) -> axum::Router
where
    R: AllocationRunRepository + 'static,
{
    allocation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/allocations/summary",
            axum::routing::post(summary_endpoint),
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

pub(crate) async fn summary_endpoint(
    Json(payload): Json<SummaryRequest>,
) -> Result<Json<AllocationReport>, AppError> {
    let SummaryRequest {
        results,
        students,
        config,
        report_date,
    } = payload;

    let config = config.unwrap_or_default();
    config.validate().map_err(AllocationError::from)?;

    Ok(Json(AllocationReport::build(
        &config,
        &results,
        &students,
        report_timestamp(report_date),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAllocationRunRepository;
    use axum::body::Body;
    use axum::http::Request;
    use fairmatch::allocation::allocate;
    use tower::ServiceExt;

    #[tokio::test]
    async fn summary_endpoint_builds_report_for_sample_results() {
        let (students, internships) = crate::demo::sample_cohort().expect("sample cohort");
        let results =
            allocate(&students, &internships, &AllocationConfig::default()).expect("allocation");

        let request = SummaryRequest {
            results: results.clone(),
            students,
            config: None,
            report_date: NaiveDate::from_ymd_opt(2025, 1, 20),
        };

        let Json(report) = summary_endpoint(Json(request))
            .await
            .expect("report builds");

        assert_eq!(report.statistics.total_allocated, results.len());
        assert_eq!(report.file_name(), "allocation-report-2025-01-20.json");
        assert_eq!(report.category_breakdown.len(), 5);
    }

    #[tokio::test]
    async fn summary_endpoint_rejects_invalid_config() {
        let mut config = AllocationConfig::default();
        config.weights.skill = -10.0;

        let request = SummaryRequest {
            results: Vec::new(),
            students: Vec::new(),
            config: Some(config),
            report_date: None,
        };

        let err = summary_endpoint(Json(request))
            .await
            .expect_err("negative weight rejected");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_route_is_mounted_next_to_allocation_routes() {
        let service = Arc::new(AllocationService::new(
            Arc::new(InMemoryAllocationRunRepository::default()),
            AllocationConfig::default(),
        ));
        let router = with_allocation_routes(service);

        let response = router
            .oneshot(
                Request::get("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
