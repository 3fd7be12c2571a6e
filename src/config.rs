//! Simulation configuration: loading from JSON or TOML, derived values, validation.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::charging::RoundingMode;
use crate::error::{Error, Result};

/// Immutable simulation parameters, loaded once per run.
///
/// Field names match the keys of the JSON configuration files the tool has
/// always read. Every field has a default, so a partial file only needs to
/// name what differs from [`Configuration::default`].
///
/// Power values are in watts, energy values in watt-hours, state-of-charge
/// values in percent of `capacity`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Energy the vehicle uses per day, subtracted after every simulated day (Wh).
    pub daily_usage: f64,
    /// Minimum state of charge the deadline guarantee aims for (%).
    pub min_soc: f64,
    /// State of charge at which every policy stops charging (%).
    pub max_soc: f64,
    /// Battery capacity (Wh).
    pub capacity: f64,
    /// Start of the weekday active window.
    #[serde(deserialize_with = "time_of_day")]
    pub start: NaiveTime,
    /// Start of the weekend active window.
    #[serde(deserialize_with = "time_of_day")]
    pub weekend_start: NaiveTime,
    /// End of the weekday active window and charging deadline.
    #[serde(deserialize_with = "time_of_day")]
    pub end: NaiveTime,
    /// End of the weekend active window and charging deadline.
    #[serde(deserialize_with = "time_of_day")]
    pub weekend_end: NaiveTime,
    /// Charger speed limit (W).
    pub max_charging_speed: f64,
    /// Fixed speed of the preset policy (W).
    pub preset_charging_speed: f64,
    /// Start of the preset charging window.
    #[serde(deserialize_with = "time_of_day")]
    pub preset_start_time: NaiveTime,
    /// End of the preset charging window.
    #[serde(deserialize_with = "time_of_day")]
    pub preset_end_time: NaiveTime,
    /// Decisions per hour; one reading interval lasts `1 / calls_per_hour` hours.
    pub calls_per_hour: u32,
    /// State of charge at simulation start (%).
    pub starting_soc: f64,
    /// First simulated day (inclusive).
    pub start_date: NaiveDate,
    /// Last simulated day (inclusive).
    pub end_date: NaiveDate,
    /// Surplus policies observe the surplus one interval late.
    pub surplus_charging_delayed: bool,
    /// Lowest speed the charger can run at (W).
    pub minimum_charge_speed: f64,
    /// Smallest power increment the charger accepts (W).
    pub charge_step_size: f64,
    /// Surplus rounding: `round_up`, `round_down` or `balanced`.
    pub step_mode: RoundingMode,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            daily_usage: 8_000.0,
            min_soc: 30.0,
            max_soc: 80.0,
            capacity: 50_000.0,
            start: hm(8, 0),
            weekend_start: hm(10, 0),
            end: hm(18, 0),
            weekend_end: hm(20, 0),
            max_charging_speed: 11_000.0,
            preset_charging_speed: 4_000.0,
            preset_start_time: hm(10, 0),
            preset_end_time: hm(14, 0),
            calls_per_hour: 12,
            starting_soc: 50.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            surplus_charging_delayed: false,
            minimum_charge_speed: 1_380.0,
            charge_step_size: 230.0,
            step_mode: RoundingMode::Balanced,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Parses `HH:MM:SS` or `HH:MM` strings, and TOML local time literals.
fn time_of_day<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TimeOfDayVisitor)
}

struct TimeOfDayVisitor;

impl<'de> Visitor<'de> for TimeOfDayVisitor {
    type Value = NaiveTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a time of day such as \"08:00\" or 08:00:00")
    }

    fn visit_str<E: de::Error>(self, raw: &str) -> Result<NaiveTime, E> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map_err(|e| E::custom(format!("invalid time \"{raw}\": {e}")))
    }

    // TOML hands date and time literals over as a single-entry map.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NaiveTime, A::Error> {
        let Some((_, raw)) = map.next_entry::<String, String>()? else {
            return Err(de::Error::custom("empty time value"));
        };
        self.visit_str(&raw)
    }
}

/// Configuration error with field name and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Offending field (e.g., `"calls_per_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl Configuration {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON, wrong types or unknown keys.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] on malformed TOML, wrong types or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads a configuration file, JSON for `.json` files and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Charge level the deadline guarantee aims for (Wh).
    pub fn minimum_charge(&self) -> f64 {
        self.min_soc * self.capacity / 100.0
    }

    /// Charge level at which charging stops (Wh).
    pub fn maximum_charge(&self) -> f64 {
        self.max_soc * self.capacity / 100.0
    }

    /// Charge at simulation start (Wh).
    pub fn starting_charge(&self) -> f64 {
        self.capacity * self.starting_soc / 100.0
    }

    /// Duration of one reading interval in hours.
    pub fn interval_hours(&self) -> f64 {
        1.0 / f64::from(self.calls_per_hour)
    }

    /// Returns the `(start, end)` active window for `date`.
    ///
    /// Saturdays and Sundays use the weekend window.
    pub fn active_window(&self, date: NaiveDate) -> (NaiveTime, NaiveTime) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            (self.weekend_start, self.weekend_end)
        } else {
            (self.start, self.end)
        }
    }

    /// Returns `true` when `date` lies within the configured date range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Validates cross-field constraints and returns every violation found.
    ///
    /// Returns an empty vector if the configuration is valid. The simulation
    /// does not call this; callers decide whether to refuse a configuration.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.calls_per_hour == 0 {
            errors.push(ConfigError::new("calls_per_hour", "must be > 0"));
        }
        if self.capacity <= 0.0 {
            errors.push(ConfigError::new("capacity", "must be > 0"));
        }
        if self.max_charging_speed <= 0.0 {
            errors.push(ConfigError::new("max_charging_speed", "must be > 0"));
        }
        if self.charge_step_size <= 0.0 {
            errors.push(ConfigError::new("charge_step_size", "must be > 0"));
        }
        if self.minimum_charge_speed < 0.0 {
            errors.push(ConfigError::new("minimum_charge_speed", "must be >= 0"));
        }
        if self.preset_charging_speed < 0.0 {
            errors.push(ConfigError::new("preset_charging_speed", "must be >= 0"));
        }
        if self.daily_usage < 0.0 {
            errors.push(ConfigError::new("daily_usage", "must be >= 0"));
        }

        if self.min_soc < 0.0 {
            errors.push(ConfigError::new("min_soc", "must be >= 0"));
        }
        if self.min_soc > self.starting_soc {
            errors.push(ConfigError::new("min_soc", "must be <= starting_soc"));
        }
        if self.starting_soc > self.max_soc {
            errors.push(ConfigError::new("starting_soc", "must be <= max_soc"));
        }
        if self.max_soc > 100.0 {
            errors.push(ConfigError::new("max_soc", "must be <= 100"));
        }

        for (field, start, end) in [
            ("start", self.start, self.end),
            ("weekend_start", self.weekend_start, self.weekend_end),
            ("preset_start_time", self.preset_start_time, self.preset_end_time),
        ] {
            if start > end {
                errors.push(ConfigError::new(field, format!("must be <= {end}")));
            }
        }

        if self.start_date > self.end_date {
            errors.push(ConfigError::new("start_date", "must be <= end_date"));
        }

        errors
    }

    /// Returns the configuration if [`Configuration::validate`] finds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] carrying every violation.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::InvalidConfig(errors))
        }
    }
}
