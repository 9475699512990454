use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use prioritizer::projects::{project_router, PrioritizationService, ProjectRepository};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_project_routes<R>(service: Arc<PrioritizationService<R>>) -> axum::Router
where
    R: ProjectRepository + 'static,
{
    project_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
        json!({ "status": "ready", "geo_priority_records": state.geo_priority_records })
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{default_engine, load_geo_table, InMemoryProjectRepository};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use prioritizer::config::GeoPriorityConfig;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let table = load_geo_table(&GeoPriorityConfig::default()).expect("sample loads");
        let service = Arc::new(PrioritizationService::new(
            default_engine(table),
            Arc::new(InMemoryProjectRepository::default()),
        ));
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            geo_priority_records: service.engine().table().len(),
        };
        (
            with_project_routes(service).layer(Extension(state)),
            readiness,
        )
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("valid request"))
            .await
            .expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (router, _) = app(false);
        let (status, payload) = get_json(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_startup_flag() {
        let (router, readiness) = app(false);
        let (status, payload) = get_json(router.clone(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        readiness.store(true, Ordering::Release);
        let (status, payload) = get_json(router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
        assert_eq!(payload["geo_priority_records"], 21);
    }

    #[tokio::test]
    async fn project_routes_are_mounted() {
        let (router, _) = app(true);
        let (status, payload) = get_json(router, "/api/v1/projects").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["projects"], json!([]));
    }
}
