use crate::cli::ServeArgs;
use crate::infra::{load_geo_table, weighted_engine, AppState, InMemoryProjectRepository};
use crate::routes::with_project_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use prioritizer::config::AppConfig;
use prioritizer::error::AppError;
use prioritizer::projects::PrioritizationService;
use prioritizer::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.geo_csv.take() {
        config.geo_priority.csv_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let table = load_geo_table(&config.geo_priority)?;
    let engine = weighted_engine(table.clone(), config.weights)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        geo_priority_records: table.len(),
    };

    let repository = Arc::new(InMemoryProjectRepository::default());
    let service = Arc::new(PrioritizationService::new(engine, repository));

    let app = with_project_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "project prioritizer ready");

    axum::serve(listener, app).await?;
    Ok(())
}
