use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{ProjectRepository, RepositoryError};
use super::service::{PrioritizationService, ServiceError};
use crate::domain::{Project, ProjectId};

/// Router builder exposing evaluation, report and ranking endpoints.
pub fn project_router<R>(service: Arc<PrioritizationService<R>>) -> Router
where
    R: ProjectRepository + 'static,
{
    Router::new()
        .route("/api/v1/projects", get(ranked_handler::<R>))
        .route("/api/v1/projects/evaluate", post(evaluate_handler::<R>))
        .route("/api/v1/projects/report", post(report_handler::<R>))
        .route("/api/v1/projects/:project_id", get(record_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankedQuery {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<PrioritizationService<R>>>,
    Json(project): Json<Project>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    match service.evaluate(project) {
        Ok(record) => (StatusCode::OK, Json(record.result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<PrioritizationService<R>>>,
    Json(project): Json<Project>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    match service.report(&project) {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<PrioritizationService<R>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    let id = ProjectId(project_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "project has not been evaluated",
                "project_id": id.0,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn ranked_handler<R>(
    State(service): State<Arc<PrioritizationService<R>>>,
    Query(query): Query<RankedQuery>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    match service.ranked(query.limit) {
        Ok(records) => {
            let summaries = records
                .iter()
                .map(|record| record.summary())
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "projects": summaries }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match error {
        ServiceError::MissingProjectId => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
