use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::normalize_key;

/// Default SROI assumed for projects that have not reported one yet.
pub const DEFAULT_FINANCIAL_RETURN_RATIO: f64 = 1.5;
/// Mid-scale territorial priority used when the storage layer has none.
pub const DEFAULT_TERRITORIAL_PRIORITY: f64 = 5.0;

/// Identifier wrapper for stored projects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Investment project as handed over by the record store. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub financial_return_ratio: Option<f64>,
    #[serde(default)]
    pub financial_return_justification: Option<String>,
    #[serde(default)]
    pub operational_relevance: Option<u8>,
    #[serde(default)]
    pub relationship_improvement: Option<u8>,
    /// Territorial priority on a 1-10 scale.
    #[serde(default)]
    pub territorial_priority: Option<f64>,
    #[serde(default)]
    pub in_strategic_corridor: bool,
    #[serde(default)]
    pub stakeholder_types: Vec<StakeholderType>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub municipalities: Vec<String>,
    #[serde(default)]
    pub sectors: Vec<InvestmentSector>,
    #[serde(default)]
    pub risk: RiskInputs,
    #[serde(default)]
    pub duration_months: u32,
    #[serde(default)]
    pub budget: f64,
    /// Set by the record store when the project sits in a priority geography.
    #[serde(default = "default_eligible")]
    pub eligible: bool,
}

fn default_eligible() -> bool {
    true
}

impl Project {
    /// Bare project with every optional field unset.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProjectId(id.into()),
            name: String::new(),
            financial_return_ratio: None,
            financial_return_justification: None,
            operational_relevance: None,
            relationship_improvement: None,
            territorial_priority: None,
            in_strategic_corridor: false,
            stakeholder_types: Vec::new(),
            regions: Vec::new(),
            municipalities: Vec::new(),
            sectors: Vec::new(),
            risk: RiskInputs::default(),
            duration_months: 0,
            budget: 0.0,
            eligible: true,
        }
    }
}

/// Probability and impact, both on a 1-5 scale, for one risk dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRating {
    #[serde(default)]
    pub probability: Option<u8>,
    #[serde(default)]
    pub impact: Option<u8>,
}

impl RiskRating {
    pub const fn new(probability: u8, impact: u8) -> Self {
        Self {
            probability: Some(probability),
            impact: Some(impact),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInputs {
    #[serde(default)]
    pub technical: RiskRating,
    #[serde(default)]
    pub social: RiskRating,
    #[serde(default)]
    pub financial: RiskRating,
    #[serde(default)]
    pub regulatory: RiskRating,
}

impl RiskInputs {
    pub const fn uniform(probability: u8, impact: u8) -> Self {
        let rating = RiskRating::new(probability, impact);
        Self {
            technical: rating,
            social: rating,
            financial: rating,
            regulatory: rating,
        }
    }

    pub fn rating(&self, dimension: RiskDimension) -> RiskRating {
        match dimension {
            RiskDimension::Technical => self.technical,
            RiskDimension::Social => self.social,
            RiskDimension::Financial => self.financial,
            RiskDimension::Regulatory => self.regulatory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDimension {
    Technical,
    Social,
    Financial,
    Regulatory,
}

impl RiskDimension {
    pub const fn ordered() -> [RiskDimension; 4] {
        [
            RiskDimension::Technical,
            RiskDimension::Social,
            RiskDimension::Financial,
            RiskDimension::Regulatory,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskDimension::Technical => "technical",
            RiskDimension::Social => "social",
            RiskDimension::Financial => "financial",
            RiskDimension::Regulatory => "regulatory",
        }
    }
}

/// Stakeholder groups engaged by a project, each with a fixed diversity weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    LocalAuthorities,
    CommunityLeaders,
    IndigenousCommunities,
    SocialOrganizations,
    PrivateSector,
    Academia,
    Media,
}

impl StakeholderType {
    /// Sum of every weight; the denominator of the diversity component.
    pub const MAX_DIVERSITY_WEIGHT: u32 = 110;

    pub const fn weight(self) -> u32 {
        match self {
            StakeholderType::LocalAuthorities => 25,
            StakeholderType::CommunityLeaders => 20,
            StakeholderType::IndigenousCommunities => 25,
            StakeholderType::SocialOrganizations => 15,
            StakeholderType::PrivateSector => 10,
            StakeholderType::Academia => 10,
            StakeholderType::Media => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StakeholderType::LocalAuthorities => "local authorities",
            StakeholderType::CommunityLeaders => "community leaders",
            StakeholderType::IndigenousCommunities => "indigenous communities",
            StakeholderType::SocialOrganizations => "social organizations",
            StakeholderType::PrivateSector => "private sector",
            StakeholderType::Academia => "academia",
            StakeholderType::Media => "media",
        }
    }
}

/// Investment sectors covered by the geo-priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentSector {
    Education,
    Health,
    WaterAndSanitation,
    Energy,
    RoadInfrastructure,
    Housing,
    Agriculture,
    Connectivity,
    Culture,
    Sports,
}

impl InvestmentSector {
    pub const fn all() -> [InvestmentSector; 10] {
        [
            InvestmentSector::Education,
            InvestmentSector::Health,
            InvestmentSector::WaterAndSanitation,
            InvestmentSector::Energy,
            InvestmentSector::RoadInfrastructure,
            InvestmentSector::Housing,
            InvestmentSector::Agriculture,
            InvestmentSector::Connectivity,
            InvestmentSector::Culture,
            InvestmentSector::Sports,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            InvestmentSector::Education => "education",
            InvestmentSector::Health => "health",
            InvestmentSector::WaterAndSanitation => "water and sanitation",
            InvestmentSector::Energy => "energy",
            InvestmentSector::RoadInfrastructure => "road infrastructure",
            InvestmentSector::Housing => "housing",
            InvestmentSector::Agriculture => "agriculture",
            InvestmentSector::Connectivity => "connectivity",
            InvestmentSector::Culture => "culture",
            InvestmentSector::Sports => "sports",
        }
    }
}

impl fmt::Display for InvestmentSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown investment sector '{0}'")]
pub struct UnknownSector(pub String);

impl FromStr for InvestmentSector {
    type Err = UnknownSector;

    /// Accepts English and Spanish labels, ignoring case, accents and separators.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(value).replace(['_', '-'], " ");
        let sector = match key.as_str() {
            "education" | "educacion" | "educacion publica" => InvestmentSector::Education,
            "health" | "salud" | "salud publica" => InvestmentSector::Health,
            "water and sanitation" | "water" | "agua potable" | "agua potable y saneamiento"
            | "agua potable y saneamiento basico" | "saneamiento" => {
                InvestmentSector::WaterAndSanitation
            }
            "energy" | "energia" => InvestmentSector::Energy,
            "road infrastructure" | "roads" | "infraestructura vial" | "vias" => {
                InvestmentSector::RoadInfrastructure
            }
            "housing" | "vivienda" => InvestmentSector::Housing,
            "agriculture" | "agropecuario" | "agricultura" => InvestmentSector::Agriculture,
            "connectivity" | "tic" | "conectividad" => InvestmentSector::Connectivity,
            "culture" | "cultura" => InvestmentSector::Culture,
            "sports" | "deporte" | "recreacion y deporte" => InvestmentSector::Sports,
            _ => return Err(UnknownSector(value.trim().to_string())),
        };
        Ok(sector)
    }
}

/// Project with every implicit default resolved, as observed by the criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectProfile {
    pub id: ProjectId,
    pub financial_return_ratio: f64,
    pub financial_return_assumed: bool,
    pub financial_return_justification: Option<String>,
    pub operational_relevance: Option<u8>,
    pub relationship_improvement: Option<u8>,
    pub territorial_priority: f64,
    pub in_strategic_corridor: bool,
    pub stakeholder_types: Vec<StakeholderType>,
    pub regions: Vec<String>,
    pub municipalities: Vec<String>,
    pub sectors: Vec<InvestmentSector>,
    pub risk: RiskInputs,
    pub duration_months: u32,
    pub budget: f64,
    pub eligible: bool,
}

impl ProjectProfile {
    pub fn from_project(project: &Project) -> Self {
        let justification = project
            .financial_return_justification
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string);

        Self {
            id: project.id.clone(),
            financial_return_ratio: project
                .financial_return_ratio
                .unwrap_or(DEFAULT_FINANCIAL_RETURN_RATIO),
            financial_return_assumed: project.financial_return_ratio.is_none(),
            financial_return_justification: justification,
            operational_relevance: project.operational_relevance,
            relationship_improvement: project.relationship_improvement,
            territorial_priority: project
                .territorial_priority
                .unwrap_or(DEFAULT_TERRITORIAL_PRIORITY),
            in_strategic_corridor: project.in_strategic_corridor,
            stakeholder_types: dedup_in_order(project.stakeholder_types.iter().copied()),
            regions: dedup_names(&project.regions),
            municipalities: dedup_names(&project.municipalities),
            sectors: dedup_in_order(project.sectors.iter().copied()),
            risk: project.risk,
            duration_months: project.duration_months,
            budget: project.budget,
            eligible: project.eligible,
        }
    }

    pub fn has_stakeholder(&self, kind: StakeholderType) -> bool {
        self.stakeholder_types.contains(&kind)
    }
}

fn dedup_in_order<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut unique = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = normalize_key(trimmed);
        if !seen.contains(&key) {
            seen.push(key);
            unique.push(trimmed.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parses_spanish_and_english_labels() {
        assert_eq!(
            "Educación".parse::<InvestmentSector>(),
            Ok(InvestmentSector::Education)
        );
        assert_eq!(
            "water_and_sanitation".parse::<InvestmentSector>(),
            Ok(InvestmentSector::WaterAndSanitation)
        );
        assert_eq!(
            " AGUA POTABLE Y SANEAMIENTO BÁSICO ".parse::<InvestmentSector>(),
            Ok(InvestmentSector::WaterAndSanitation)
        );
        assert_eq!(
            "Energía".parse::<InvestmentSector>(),
            Ok(InvestmentSector::Energy)
        );
        assert_eq!(
            "mining".parse::<InvestmentSector>(),
            Err(UnknownSector("mining".to_string()))
        );
    }

    #[test]
    fn stakeholder_weights_sum_to_diversity_maximum() {
        let total: u32 = [
            StakeholderType::LocalAuthorities,
            StakeholderType::CommunityLeaders,
            StakeholderType::IndigenousCommunities,
            StakeholderType::SocialOrganizations,
            StakeholderType::PrivateSector,
            StakeholderType::Academia,
            StakeholderType::Media,
        ]
        .into_iter()
        .map(StakeholderType::weight)
        .sum();
        assert_eq!(total, StakeholderType::MAX_DIVERSITY_WEIGHT);
    }

    #[test]
    fn profile_applies_defaults_and_dedups_names() {
        let mut project = Project::new("p-1");
        project.regions = vec!["Nariño".to_string(), " NARINO ".to_string()];
        project.municipalities = vec![
            "Magüí".to_string(),
            String::new(),
            "MAGUI".to_string(),
            "Tumaco".to_string(),
        ];
        project.stakeholder_types = vec![StakeholderType::Media, StakeholderType::Media];
        project.financial_return_justification = Some("   ".to_string());

        let profile = ProjectProfile::from_project(&project);

        assert_eq!(profile.financial_return_ratio, DEFAULT_FINANCIAL_RETURN_RATIO);
        assert!(profile.financial_return_assumed);
        assert_eq!(profile.territorial_priority, DEFAULT_TERRITORIAL_PRIORITY);
        assert_eq!(profile.regions, vec!["Nariño".to_string()]);
        assert_eq!(
            profile.municipalities,
            vec!["Magüí".to_string(), "Tumaco".to_string()]
        );
        assert_eq!(profile.stakeholder_types, vec![StakeholderType::Media]);
        assert!(profile.financial_return_justification.is_none());
    }

    #[test]
    fn project_deserializes_with_defaults() {
        let project: Project = serde_json::from_str(
            r#"{"id":"p-9","sectors":["education"],"risk":{"technical":{"probability":2,"impact":3}}}"#,
        )
        .expect("valid payload");
        assert!(project.eligible);
        assert_eq!(project.sectors, vec![InvestmentSector::Education]);
        assert_eq!(project.risk.technical, RiskRating::new(2, 3));
        assert_eq!(project.risk.social, RiskRating::default());
    }
}
