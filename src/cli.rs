use std::path::PathBuf;

use clap::Parser;

use pv_charge_sim::sim::kpi::Prices;

/// Compare EV charging policies on recorded PV production and consumption.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Readings CSV with `time,output,consumption` columns.
    #[arg(long, default_value = "data.csv", env = "PV_CHARGE_SIM_DATAFILE")]
    pub datafile: PathBuf,

    /// Configuration file, JSON for `.json` and TOML otherwise.
    #[arg(long, default_value = "config.json", env = "PV_CHARGE_SIM_CONFIGFILE")]
    pub configfile: PathBuf,

    /// Result CSV to write.
    #[arg(long, default_value = "out.csv")]
    pub out: PathBuf,

    /// Value of self-consumed PV energy per kWh.
    #[arg(long, default_value_t = 0.097)]
    pub solar_price: f64,

    /// Grid energy price per kWh.
    #[arg(long, default_value_t = 0.33)]
    pub grid_price: f64,

    /// Do not print the per-interval trace.
    #[arg(long, short)]
    pub quiet: bool,
}

impl Args {
    pub fn prices(&self) -> Prices {
        Prices {
            solar_per_kwh: self.solar_price,
            grid_per_kwh: self.grid_price,
        }
    }
}
