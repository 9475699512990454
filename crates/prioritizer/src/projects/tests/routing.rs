use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::projects::router::{evaluate_handler, record_handler};
use crate::projects::PrioritizationService;

fn json_request(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializable")))
        .expect("valid request")
}

#[tokio::test]
async fn evaluate_route_returns_score_result() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/v1/projects/evaluate",
            &project("PRJ-10", 3.0),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("project_id"), Some(&Value::from("PRJ-10")));
    assert!(payload.get("total_score").and_then(Value::as_f64).is_some());
    assert_eq!(
        payload
            .get("criteria")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(4)
    );
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn report_route_returns_plain_text() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/api/v1/projects/report",
            &project("PRJ-11", 0.8),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    let body = read_text_body(response).await;
    assert!(body.contains("(REJECTED)"));
    assert!(body.contains("PROJECT REJECTED"));
}

#[tokio::test]
async fn record_route_returns_stored_evaluation() {
    let (service, _) = build_service();
    service
        .evaluate(project("PRJ-12", 2.5))
        .expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/projects/PRJ-12")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload.get("evaluated_at").is_some());
    assert_eq!(
        payload.pointer("/result/project_id"),
        Some(&Value::from("PRJ-12"))
    );
}

#[tokio::test]
async fn record_handler_returns_not_found_for_unknown_project() {
    let (service, _) = build_service();

    let response =
        record_handler::<MemoryRepository>(State(Arc::new(service)), Path("missing".to_string()))
            .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("project_id"), Some(&Value::from("missing")));
}

#[tokio::test]
async fn ranked_route_lists_best_projects_first() {
    let (service, _) = build_service();
    service.evaluate(project("b", 0.5)).expect("stored");
    service.evaluate(project("a", 3.5)).expect("stored");
    service.evaluate(project("c", 2.2)).expect("stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/projects?limit=2")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ids = payload
        .get("projects")
        .and_then(Value::as_array)
        .expect("projects array")
        .iter()
        .filter_map(|entry| entry.get("project_id").and_then(Value::as_str))
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn evaluate_handler_maps_blank_id_to_unprocessable() {
    let (service, _) = build_service();

    let response = evaluate_handler::<MemoryRepository>(
        State(Arc::new(service)),
        axum::Json(project("", 2.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn evaluate_handler_maps_repository_outage_to_unavailable() {
    let service = PrioritizationService::new(engine(), Arc::new(UnavailableRepository));

    let response = evaluate_handler::<UnavailableRepository>(
        State(Arc::new(service)),
        axum::Json(project("PRJ-13", 2.0)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
