use std::collections::BTreeMap;
use std::io::Read;

use calc_core::{SlabTable, SlabTableError, TaxSlab};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading slab tables.
#[derive(Debug, Error, PartialEq)]
pub enum SlabLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("no slabs found")]
    Empty,

    #[error("regime '{regime}': value {value} cannot be used as a slab bound or rate")]
    OutOfRange { regime: String, value: Decimal },

    #[error("regime '{regime}': {source}")]
    InvalidTable {
        regime: String,
        #[source]
        source: SlabTableError,
    },
}

impl From<csv::Error> for SlabLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a slab CSV file.
///
/// - `regime`: code of the regime the slab belongs to (e.g. `new`)
/// - `min`: exclusive lower bound of the slab
/// - `max`: inclusive upper bound (empty for the unbounded top slab)
/// - `rate_percent`: rate applied inside the slab, in percent (e.g. `5` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub regime: String,
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate_percent: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl SlabRecord {
    fn to_slab(&self) -> Result<TaxSlab, SlabLoaderError> {
        let convert = |value: Decimal| {
            value.to_f64().ok_or_else(|| SlabLoaderError::OutOfRange {
                regime: self.regime.clone(),
                value,
            })
        };

        Ok(TaxSlab {
            min: convert(self.min)?,
            max: self.max.map(&convert).transpose()?,
            rate_percent: convert(self.rate_percent)?,
        })
    }
}

/// Loader for progressive slab tables from CSV files.
///
/// Rows may come in any order; they are grouped by regime and sorted by
/// `min` before the table is validated.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build one validated table per regime.
    pub fn build(records: &[SlabRecord]) -> Result<BTreeMap<String, SlabTable>, SlabLoaderError> {
        if records.is_empty() {
            return Err(SlabLoaderError::Empty);
        }

        let mut groups: BTreeMap<&str, Vec<&SlabRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.regime.as_str()).or_default().push(record);
        }

        let mut tables = BTreeMap::new();
        for (regime, mut group) in groups {
            group.sort_by(|a, b| a.min.cmp(&b.min));

            let slabs = group
                .iter()
                .map(|record| record.to_slab())
                .collect::<Result<Vec<_>, _>>()?;
            let table = SlabTable::new(slabs).map_err(|source| SlabLoaderError::InvalidTable {
                regime: regime.to_string(),
                source,
            })?;

            debug!(regime, slabs = table.slabs().len(), "loaded slab table");
            tables.insert(regime.to_string(), table);
        }

        Ok(tables)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<BTreeMap<String, SlabTable>, SlabLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}
