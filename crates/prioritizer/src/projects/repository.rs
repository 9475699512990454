use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Project, ProjectId};
use crate::scoring::{PriorityTier, ScoreResult};

/// Stored evaluation: the project as submitted, its score and when it was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub project: Project,
    pub result: ScoreResult,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            project_id: self.project.id.clone(),
            name: self.project.name.clone(),
            total_score: self.result.total_score,
            tier: self.result.tier,
            alerts: self.result.alerts.len(),
            evaluated_at: self.evaluated_at,
        }
    }
}

/// Row of the ranked listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub project_id: ProjectId,
    pub name: String,
    pub total_score: f64,
    pub tier: PriorityTier,
    pub alerts: usize,
    pub evaluated_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ProjectRepository: Send + Sync {
    /// Stores the record, replacing any previous evaluation of the same project.
    fn upsert(&self, record: EvaluationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProjectId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
