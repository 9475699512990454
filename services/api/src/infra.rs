use metrics_exporter_prometheus::PrometheusHandle;
use prioritizer::config::GeoPriorityConfig;
use prioritizer::domain::ProjectId;
use prioritizer::error::AppError;
use prioritizer::geo::GeoPriorityTable;
use prioritizer::projects::{EvaluationRecord, ProjectRepository, RepositoryError};
use prioritizer::scoring::{ScoringConfig, ScoringEngine, ScoringWeights};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) geo_priority_records: usize,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProjectRepository {
    records: Arc<Mutex<HashMap<ProjectId, EvaluationRecord>>>,
}

impl ProjectRepository for InMemoryProjectRepository {
    fn upsert(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        guard.insert(record.project.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

/// Geo-priority table from the configured CSV, or the bundled sample when none is set.
pub(crate) fn load_geo_table(config: &GeoPriorityConfig) -> Result<Arc<GeoPriorityTable>, AppError> {
    let table = match &config.csv_path {
        Some(path) => load_from_path(path)?,
        None => {
            let table = GeoPriorityTable::sample()?;
            warn!(
                records = table.len(),
                "APP_GEO_PRIORITY_CSV not set; using the bundled geo-priority sample"
            );
            table
        }
    };
    Ok(Arc::new(table))
}

fn load_from_path(path: &Path) -> Result<GeoPriorityTable, AppError> {
    let table = GeoPriorityTable::from_path(path)?;
    info!(path = %path.display(), records = table.len(), "geo-priority table loaded");
    Ok(table)
}

pub(crate) fn default_engine(table: Arc<GeoPriorityTable>) -> Arc<ScoringEngine> {
    Arc::new(ScoringEngine::with_default_config(table))
}

pub(crate) fn weighted_engine(
    table: Arc<GeoPriorityTable>,
    weights: ScoringWeights,
) -> Result<Arc<ScoringEngine>, AppError> {
    let config = ScoringConfig {
        weights,
        ..ScoringConfig::default()
    };
    Ok(Arc::new(ScoringEngine::new(table, config)?))
}
