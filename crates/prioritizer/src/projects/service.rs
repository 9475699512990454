use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::repository::{EvaluationRecord, ProjectRepository, RepositoryError};
use crate::domain::{Project, ProjectId};
use crate::scoring::{by_priority, generate_report, ScoreResult, ScoringEngine};

/// Service composing the scoring engine with evaluation storage.
pub struct PrioritizationService<R> {
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
}

impl<R> PrioritizationService<R>
where
    R: ProjectRepository + 'static,
{
    pub fn new(engine: Arc<ScoringEngine>, repository: Arc<R>) -> Self {
        Self { engine, repository }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score a project and persist the outcome, replacing earlier evaluations.
    pub fn evaluate(&self, project: Project) -> Result<EvaluationRecord, ServiceError> {
        let result = self.score(&project)?;
        let record = EvaluationRecord {
            project,
            result,
            evaluated_at: Utc::now(),
        };

        self.repository.upsert(record.clone())?;
        info!(
            project = %record.project.id,
            total = record.result.total_score,
            tier = record.result.tier.label(),
            "evaluation stored"
        );
        Ok(record)
    }

    /// Plain-text report for a project without storing anything.
    pub fn report(&self, project: &Project) -> Result<String, ServiceError> {
        let result = self.score(project)?;
        Ok(generate_report(&result))
    }

    /// Fetch the latest stored evaluation of a project.
    pub fn get(&self, id: &ProjectId) -> Result<EvaluationRecord, ServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Stored evaluations, best score first, optionally truncated to `limit`.
    pub fn ranked(&self, limit: Option<usize>) -> Result<Vec<EvaluationRecord>, ServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|left, right| by_priority(&left.result, &right.result));

        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    fn score(&self, project: &Project) -> Result<ScoreResult, ServiceError> {
        if project.id.0.trim().is_empty() {
            return Err(ServiceError::MissingProjectId);
        }
        Ok(self.engine.evaluate(project))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("project id must not be empty")]
    MissingProjectId,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
