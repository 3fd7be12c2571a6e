//! File formats around the simulation: reading input, writing results.

pub mod export;
pub mod readings;
