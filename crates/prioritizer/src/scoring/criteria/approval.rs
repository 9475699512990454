//! Approval probability criterion. A project qualifies at its strongest
//! municipality/sector combination in the geo-priority table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::is_geo_priority;
use crate::domain::{InvestmentSector, ProjectProfile};
use crate::geo::{GeoPriorityTable, MAX_SECTOR_PRIORITY};

/// One `(municipality, sector)` pair found in the table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorMatch {
    pub region: String,
    pub municipality: String,
    pub sector: InvestmentSector,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalAssessment {
    pub score: f64,
    pub matches: Vec<SectorMatch>,
    /// Best priority found per sector.
    pub sector_priorities: BTreeMap<InvestmentSector, u8>,
    pub max_priority: Option<u8>,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ApprovalAssessment {
    pub fn matched_municipalities(&self) -> Vec<String> {
        self.matches
            .iter()
            .map(|found| found.municipality.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Region under which a municipality is looked up. Ambiguous multi-region projects
/// fall back to the first listed region.
pub fn resolve_region<'a>(
    table: &GeoPriorityTable,
    regions: &'a [String],
    municipality: &str,
) -> Option<&'a str> {
    match regions {
        [] => None,
        [only] => Some(only.as_str()),
        [first, ..] => {
            let registered = regions
                .iter()
                .find(|region| table.is_priority_municipality(region, municipality));
            Some(registered.unwrap_or(first).as_str())
        }
    }
}

pub fn assess(profile: &ProjectProfile, table: &GeoPriorityTable) -> ApprovalAssessment {
    let mut matches = Vec::new();

    for municipality in &profile.municipalities {
        let Some(region) = resolve_region(table, &profile.regions, municipality) else {
            continue;
        };
        let Some(record) = table.record(region, municipality) else {
            continue;
        };

        for sector in &profile.sectors {
            if let Some(priority) = record.priorities.get(sector).copied() {
                if priority > 0 {
                    matches.push(SectorMatch {
                        region: record.region.clone(),
                        municipality: record.municipality.clone(),
                        sector: *sector,
                        priority,
                    });
                }
            }
        }
    }
    matches.sort();

    let mut sector_priorities = BTreeMap::new();
    for found in &matches {
        let best = sector_priorities.entry(found.sector).or_insert(found.priority);
        *best = (*best).max(found.priority);
    }
    let max_priority = matches.iter().map(|found| found.priority).max();

    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();

    let score = match max_priority {
        Some(priority) => f64::from(priority) / f64::from(MAX_SECTOR_PRIORITY) * 100.0,
        None => {
            let any_priority_municipality = profile
                .municipalities
                .iter()
                .any(|municipality| is_geo_priority(table, &profile.regions, municipality));
            if profile.sectors.is_empty() {
                alerts.push(
                    "No investment sectors listed: project is not eligible under the geo-priority mechanism"
                        .to_string(),
                );
            } else if any_priority_municipality {
                alerts.push(
                    "Listed sectors are not prioritized in the project's municipalities: not eligible under the geo-priority mechanism"
                        .to_string(),
                );
            } else {
                alerts.push(
                    "No municipality matches the geo-priority list: not eligible under the geo-priority mechanism"
                        .to_string(),
                );
            }
            recommendations.push(
                "Target a designated priority municipality or a sector prioritized there".to_string(),
            );
            0.0
        }
    };

    ApprovalAssessment {
        score,
        matches,
        sector_priorities,
        max_priority,
        alerts,
        recommendations,
    }
}
