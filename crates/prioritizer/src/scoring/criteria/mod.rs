//! The four criterion calculators. Each one is a pure function of the resolved
//! project profile (plus the read-only geo table where needed) and returns its own
//! assessment so the engine can keep an auditable breakdown.

pub mod approval;
pub mod financial;
pub mod risk;
pub mod stakeholder;

use crate::geo::GeoPriorityTable;

/// Input problem detected by a single criterion. The engine recovers from it by
/// zeroing that criterion only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriterionError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CriterionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// True when the municipality is registered as geo-priority under any listed region.
pub(crate) fn is_geo_priority(table: &GeoPriorityTable, regions: &[String], municipality: &str) -> bool {
    regions
        .iter()
        .any(|region| table.is_priority_municipality(region, municipality))
}

pub(crate) fn validate_scale(
    field: &'static str,
    value: Option<u8>,
) -> Result<Option<u8>, CriterionError> {
    match value {
        Some(level) if !(1..=5).contains(&level) => Err(CriterionError::invalid(
            field,
            format!("expected a level between 1 and 5, found {level}"),
        )),
        other => Ok(other),
    }
}
