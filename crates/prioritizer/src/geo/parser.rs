use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One `region,municipality,sector,priority` line of a geo-priority export.
#[derive(Debug)]
pub(crate) struct GeoPriorityRow {
    pub(crate) line: u64,
    pub(crate) region: Option<String>,
    pub(crate) municipality: Option<String>,
    pub(crate) sector: Option<String>,
    pub(crate) priority: i64,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<GeoPriorityRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        let raw = record?;
        rows.push(GeoPriorityRow {
            // header occupies line 1
            line: index as u64 + 2,
            region: raw.region,
            municipality: raw.municipality,
            sector: raw.sector,
            priority: raw.priority,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(
        rename = "Region",
        alias = "region",
        alias = "Departamento",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    region: Option<String>,
    #[serde(
        rename = "Municipality",
        alias = "municipality",
        alias = "Municipio",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    municipality: Option<String>,
    #[serde(
        rename = "Sector",
        alias = "sector",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    sector: Option<String>,
    #[serde(rename = "Priority", alias = "priority", alias = "Prioridad")]
    priority: i64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
