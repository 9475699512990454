use std::sync::Arc;

use crate::domain::{InvestmentSector, Project, RiskInputs, StakeholderType};
use crate::geo::{GeoPriorityRecord, GeoPriorityTable};
use crate::scoring::ScoringEngine;

pub(super) fn table() -> Arc<GeoPriorityTable> {
    let table = GeoPriorityTable::from_records([
        GeoPriorityRecord::new("Nariño", "Magüí")
            .with_priority(InvestmentSector::WaterAndSanitation, 10)
            .with_priority(InvestmentSector::Education, 9),
        GeoPriorityRecord::new("Cauca", "Argelia")
            .with_priority(InvestmentSector::Agriculture, 7),
    ])
    .expect("valid table");
    Arc::new(table)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::with_default_config(table())
}

/// Well-documented water project in a top-priority municipality.
pub(super) fn strong_project(id: &str) -> Project {
    let mut project = Project::new(id);
    project.name = "Acueducto rural Magüí".to_string();
    project.financial_return_ratio = Some(4.8);
    project.operational_relevance = Some(5);
    project.relationship_improvement = Some(5);
    project.territorial_priority = Some(9.0);
    project.in_strategic_corridor = true;
    project.stakeholder_types = vec![
        StakeholderType::LocalAuthorities,
        StakeholderType::CommunityLeaders,
        StakeholderType::SocialOrganizations,
    ];
    project.regions = vec!["Nariño".to_string()];
    project.municipalities = vec!["Magüí".to_string()];
    project.sectors = vec![InvestmentSector::WaterAndSanitation];
    project.risk = RiskInputs::uniform(1, 1);
    project.duration_months = 18;
    project.budget = 2_000_000_000.0;
    project
}
