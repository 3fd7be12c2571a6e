//! Simulator entry point: load inputs, run every policy, export and evaluate.

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pv_charge_sim::config::Configuration;
use pv_charge_sim::io::readings::read_readings;
use pv_charge_sim::runner::run_to_csv;
use pv_charge_sim::sim::kpi::CostReport;

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pv_charge_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Configuration::from_file(&args.configfile)
        .with_context(|| format!("failed to load {}", args.configfile.display()))?
        .validated()?;
    if config.step_mode.is_passthrough() {
        warn!(
            step_mode = %config.step_mode,
            "unknown step mode, surplus is used without rounding"
        );
    }

    let readings = read_readings(&args.datafile)
        .with_context(|| format!("failed to read {}", args.datafile.display()))?;
    info!(path = %args.datafile.display(), readings = readings.len(), "loaded readings");

    let interval_hours = config.interval_hours();
    let results = run_to_csv(config, &readings, &args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    if results.is_empty() {
        return Ok(());
    }

    if !args.quiet {
        for r in &results {
            println!("{r}");
        }
    }

    let report = CostReport::from_results(&results, interval_hours, args.prices());
    println!("\n{report}");

    Ok(())
}
