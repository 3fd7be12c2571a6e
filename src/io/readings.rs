//! CSV import of PV production and consumption readings.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::sim::types::Reading;

/// Timestamp layouts accepted in the `time` column.
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(deserialize_with = "timestamp")]
    time: NaiveDateTime,
    output: f64,
    consumption: f64,
}

fn timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{raw}\"")))
}

/// Reads readings from a CSV file with a `time,output,consumption` header.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row is malformed.
pub fn read_readings(path: &Path) -> Result<Vec<Reading>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_readings_from(file)
}

/// Reads readings as CSV from any reader, keeping the input order.
///
/// Extra columns are ignored.
///
/// # Errors
///
/// Returns [`Error::Csv`] naming the offending record if a row does not parse.
pub fn read_readings_from(reader: impl Read) -> Result<Vec<Reading>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<Row>()
        .map(|row| -> Result<Reading> {
            let row = row?;
            Ok(Reading::new(row.time, row.output, row.consumption))
        })
        .collect()
}
