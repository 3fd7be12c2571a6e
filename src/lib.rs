//! Offline comparison of EV charging policies on recorded PV and consumption data.

/// Charging policies and surplus rounding.
pub mod charging;
pub mod config;
pub mod error;
pub mod io;
pub mod runner;
/// Simulation engine, records and cost evaluation.
pub mod sim;

pub use error::{Error, Result};
