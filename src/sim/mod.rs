/// Day-by-day driver advancing every policy's battery.
pub mod engine;
/// Cost and PV share evaluation of a finished run.
pub mod kpi;
pub mod types;
