//! Multi-criteria prioritization of social investment projects.
//!
//! The [`scoring::ScoringEngine`] combines financial return, stakeholder impact,
//! approval probability and risk into one auditable 0-100 score, using the
//! [`geo::GeoPriorityTable`] for municipality/sector priorities. The [`projects`]
//! module wraps the engine in a repository-backed service and an axum router.

pub mod config;
pub mod domain;
pub mod error;
pub mod geo;
pub mod projects;
pub mod scoring;
pub mod telemetry;
