//! One complete simulation run, from loaded inputs to the result file.

use std::path::Path;

use tracing::info;

use crate::config::Configuration;
use crate::error::Result;
use crate::io::export::export_csv;
use crate::sim::engine::Engine;
use crate::sim::types::{Reading, StepResult};

/// Simulates all four policies and writes the result CSV to `out`.
///
/// The file is written even when no reading fell inside an active window,
/// then holding only the header, so an earlier run's output never survives
/// under the new run's name.
///
/// # Errors
///
/// Returns an error if the result file cannot be written.
pub fn run_to_csv(
    config: Configuration,
    readings: &[Reading],
    out: &Path,
) -> Result<Vec<StepResult>> {
    let mut engine = Engine::new(config);
    let results = engine.run(readings);

    export_csv(&results, out)?;
    info!(path = %out.display(), rows = results.len(), "simulation completed");
    Ok(results)
}
