//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use pv_charge_sim::config::Configuration;
use pv_charge_sim::sim::types::Reading;

/// Friday, 12 July 2024. Weekday window 08:00-18:00 applies.
pub fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 12).unwrap_or_default()
}

/// Timestamp on `date` at `h:m`.
pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap_or_default()
}

/// Small charger scenario: 50 kWh battery starting at 20 %, minimum 30 %,
/// maximum 80 %, 1 kW charger, 200 W steps with balanced rounding.
pub fn small_charger_config() -> Configuration {
    Configuration {
        capacity: 50_000.0,
        starting_soc: 20.0,
        min_soc: 30.0,
        max_soc: 80.0,
        max_charging_speed: 1000.0,
        preset_charging_speed: 4000.0,
        calls_per_hour: 12,
        minimum_charge_speed: 200.0,
        charge_step_size: 200.0,
        ..Configuration::default()
    }
}

/// Three morning readings with surpluses of 300, 800 and 100 W.
pub fn three_readings() -> Vec<Reading> {
    let day = friday();
    vec![
        Reading::new(at(day, 10, 0), 500.0, 200.0),
        Reading::new(at(day, 10, 5), 1000.0, 200.0),
        Reading::new(at(day, 10, 10), 300.0, 200.0),
    ]
}

/// Five-minute readings with a constant surplus across `[from_h, to_h)`.
pub fn constant_day(date: NaiveDate, from_h: u32, to_h: u32, output_w: f64) -> Vec<Reading> {
    (from_h..to_h)
        .flat_map(|h| (0..60).step_by(5).map(move |m| (h, m)))
        .map(|(h, m)| Reading::new(at(date, h, m), output_w, 200.0))
        .collect()
}
