use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::domain::{InvestmentSector, Project, ProjectId, RiskInputs, StakeholderType};
use crate::geo::GeoPriorityTable;
use crate::projects::repository::{EvaluationRecord, ProjectRepository, RepositoryError};
use crate::projects::{project_router, PrioritizationService};
use crate::scoring::ScoringEngine;

pub(super) fn engine() -> Arc<ScoringEngine> {
    let table = GeoPriorityTable::sample().expect("bundled sample loads");
    Arc::new(ScoringEngine::with_default_config(Arc::new(table)))
}

pub(super) fn project(id: &str, ratio: f64) -> Project {
    let mut project = Project::new(id);
    project.name = format!("Project {id}");
    project.financial_return_ratio = Some(ratio);
    project.operational_relevance = Some(4);
    project.relationship_improvement = Some(4);
    project.stakeholder_types = vec![
        StakeholderType::LocalAuthorities,
        StakeholderType::CommunityLeaders,
    ];
    project.regions = vec!["Norte de Santander".to_string()];
    project.municipalities = vec!["Tibú".to_string()];
    project.sectors = vec![InvestmentSector::Education];
    project.risk = RiskInputs::uniform(2, 2);
    project.duration_months = 12;
    project.budget = 800_000_000.0;
    project
}

pub(super) fn build_service() -> (PrioritizationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PrioritizationService::new(engine(), repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: PrioritizationService<MemoryRepository>) -> axum::Router {
    project_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ProjectId, EvaluationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ProjectRepository for MemoryRepository {
    fn upsert(&self, record: EvaluationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.project.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ProjectRepository for UnavailableRepository {
    fn upsert(&self, _record: EvaluationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProjectId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
