//! Repository-backed prioritization service and its HTTP surface.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{EvaluationRecord, EvaluationSummary, ProjectRepository, RepositoryError};
pub use router::project_router;
pub use service::{PrioritizationService, ServiceError};
