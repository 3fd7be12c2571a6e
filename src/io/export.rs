//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::charging::StrategyKind;
use crate::error::{Error, Result};
use crate::sim::types::StepResult;

/// Timestamp layout of the `time` column.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column header: `time,surplus`, then power and SoC per policy.
pub fn header() -> Vec<String> {
    let mut columns = vec!["time".to_string(), "surplus".to_string()];
    for kind in StrategyKind::ALL {
        columns.push(format!("{kind}_charging_power"));
        columns.push(format!("{kind}_charging_soc"));
    }
    columns
}

/// Exports simulation results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes simulation results as CSV to any writer.
///
/// One row per result, policies in [`StrategyKind::ALL`] order. A policy
/// missing from a result leaves its two cells empty.
///
/// # Errors
///
/// Returns [`Error::Csv`] if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(header())?;

    for r in results {
        let mut record = Vec::with_capacity(2 + 2 * StrategyKind::ALL.len());
        record.push(r.time.format(TIME_FORMAT).to_string());
        record.push(r.surplus_w.to_string());
        for kind in StrategyKind::ALL {
            match r.outcome(kind) {
                Some(o) => {
                    record.push(o.charging_power_w.to_string());
                    record.push(o.soc_pct.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
