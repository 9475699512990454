//! Geo-priority lookup: which municipalities are designated priority zones and how
//! strongly each investment sector is prioritized there.
//!
//! The table is built once (from a CSV export or explicit records) and is read-only
//! afterwards, so a single instance can be shared across threads behind an `Arc`.

mod normalize;
mod parser;

pub use normalize::normalize_key;

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{InvestmentSector, UnknownSector};

/// Lowest and highest sector priority accepted in the table.
pub const MIN_SECTOR_PRIORITY: u8 = 1;
pub const MAX_SECTOR_PRIORITY: u8 = 10;

const SAMPLE_CSV: &str = include_str!("../../data/geo_priority_sample.csv");

/// Sector priorities designated for one municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPriorityRecord {
    pub region: String,
    pub municipality: String,
    pub priorities: BTreeMap<InvestmentSector, u8>,
}

impl GeoPriorityRecord {
    pub fn new(region: impl Into<String>, municipality: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            municipality: municipality.into(),
            priorities: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, sector: InvestmentSector, priority: u8) -> Self {
        self.priorities.insert(sector, priority);
        self
    }
}

/// Configuration errors raised while building the table. Fatal at load time.
#[derive(Debug, thiserror::Error)]
pub enum GeoTableError {
    #[error("failed to read geo-priority data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid geo-priority CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },
    #[error("line {line}: {source}")]
    UnknownSector { line: u64, source: UnknownSector },
    #[error("priority {priority} for {sector} in {municipality} ({region}) is outside 1-10")]
    PriorityOutOfRange {
        region: String,
        municipality: String,
        sector: InvestmentSector,
        priority: i64,
    },
    #[error("duplicate geo-priority record for {municipality} ({region})")]
    DuplicateRecord { region: String, municipality: String },
    #[error("{sector} listed twice for {municipality} ({region})")]
    DuplicateSector {
        region: String,
        municipality: String,
        sector: InvestmentSector,
    },
    #[error("geo-priority table has no records")]
    Empty,
}

type TableKey = (String, String);

/// In-memory geo-priority table keyed by normalized `(region, municipality)`.
#[derive(Debug, Clone)]
pub struct GeoPriorityTable {
    records: HashMap<TableKey, GeoPriorityRecord>,
}

impl GeoPriorityTable {
    /// Builds the table from explicit records, enforcing one record per pair.
    pub fn from_records<I>(records: I) -> Result<Self, GeoTableError>
    where
        I: IntoIterator<Item = GeoPriorityRecord>,
    {
        let mut table = HashMap::new();

        for record in records {
            for (sector, priority) in &record.priorities {
                ensure_priority_in_range(&record, *sector, i64::from(*priority))?;
            }

            let key = table_key(&record.region, &record.municipality);
            if table.contains_key(&key) {
                return Err(GeoTableError::DuplicateRecord {
                    region: record.region,
                    municipality: record.municipality,
                });
            }
            table.insert(key, record);
        }

        if table.is_empty() {
            return Err(GeoTableError::Empty);
        }

        Ok(Self { records: table })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GeoTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads a long-format CSV export: `Region,Municipality,Sector,Priority`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeoTableError> {
        let mut grouped: Vec<GeoPriorityRecord> = Vec::new();
        let mut positions: HashMap<TableKey, usize> = HashMap::new();

        for row in parser::parse_rows(reader)? {
            let region = row.region.ok_or(GeoTableError::MissingField {
                line: row.line,
                field: "region",
            })?;
            let municipality = row.municipality.ok_or(GeoTableError::MissingField {
                line: row.line,
                field: "municipality",
            })?;
            let sector_label = row.sector.ok_or(GeoTableError::MissingField {
                line: row.line,
                field: "sector",
            })?;
            let sector = sector_label
                .parse::<InvestmentSector>()
                .map_err(|source| GeoTableError::UnknownSector {
                    line: row.line,
                    source,
                })?;

            let key = table_key(&region, &municipality);
            let index = *positions.entry(key).or_insert_with(|| {
                grouped.push(GeoPriorityRecord::new(region, municipality));
                grouped.len() - 1
            });
            let record = &mut grouped[index];

            ensure_priority_in_range(record, sector, row.priority)?;
            if record.priorities.contains_key(&sector) {
                return Err(GeoTableError::DuplicateSector {
                    region: record.region.clone(),
                    municipality: record.municipality.clone(),
                    sector,
                });
            }
            // range checked above
            record.priorities.insert(sector, row.priority as u8);
        }

        Self::from_records(grouped)
    }

    /// Bundled sample of designated municipalities used by demos and tests.
    pub fn sample() -> Result<Self, GeoTableError> {
        Self::from_reader(SAMPLE_CSV.as_bytes())
    }

    pub fn lookup(
        &self,
        region: &str,
        municipality: &str,
    ) -> Option<&BTreeMap<InvestmentSector, u8>> {
        self.record(region, municipality)
            .map(|record| &record.priorities)
    }

    pub fn record(&self, region: &str, municipality: &str) -> Option<&GeoPriorityRecord> {
        self.records.get(&table_key(region, municipality))
    }

    pub fn is_priority_municipality(&self, region: &str, municipality: &str) -> bool {
        self.records
            .contains_key(&table_key(region, municipality))
    }

    pub fn sector_priority(
        &self,
        region: &str,
        municipality: &str,
        sector: InvestmentSector,
    ) -> Option<u8> {
        self.lookup(region, municipality)
            .and_then(|priorities| priorities.get(&sector).copied())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn table_key(region: &str, municipality: &str) -> TableKey {
    (normalize_key(region), normalize_key(municipality))
}

fn ensure_priority_in_range(
    record: &GeoPriorityRecord,
    sector: InvestmentSector,
    priority: i64,
) -> Result<(), GeoTableError> {
    let range = i64::from(MIN_SECTOR_PRIORITY)..=i64::from(MAX_SECTOR_PRIORITY);
    if range.contains(&priority) {
        Ok(())
    } else {
        Err(GeoTableError::PriorityOutOfRange {
            region: record.region.clone(),
            municipality: record.municipality.clone(),
            sector,
            priority,
        })
    }
}
