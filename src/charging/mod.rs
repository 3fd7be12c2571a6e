//! Charging policies compared by the simulation.
//!
//! Each policy answers one question per interval: given the battery charge,
//! the time left in the active window and the current PV surplus, how much
//! power should the charger draw?

use std::fmt;

use chrono::NaiveTime;

use crate::config::Configuration;

/// Preset-window charging at a fixed speed.
pub mod preset;
/// Snapping surplus power to supported charger speeds.
pub mod rounding;
/// Surplus-following charging with a deadline guarantee.
pub mod surplus;
/// Charging at full speed whenever connected.
pub mod uncontrolled;

pub use preset::PresetCharging;
pub use rounding::RoundingMode;
pub use surplus::SurplusCharging;
pub use uncontrolled::UncontrolledCharging;

/// Everything a policy may look at when deciding one interval.
#[derive(Debug, Clone, Copy)]
pub struct StepInput {
    /// Minutes left until the end of the day's active window.
    pub time_left_min: f64,
    /// Energy currently stored in the battery (Wh).
    pub current_charge_wh: f64,
    /// Wall clock time of the reading.
    pub time: NaiveTime,
    /// PV production (W).
    pub output_w: f64,
    /// Household consumption (W).
    pub consumption_w: f64,
}

/// A per-interval charging decision.
pub trait ChargingStrategy {
    /// Returns the charging power (W) to hold for the coming interval.
    fn step(&mut self, input: &StepInput) -> f64;
}

/// Power that tops up `remaining_wh` within one interval without exceeding `speed_w`.
///
/// The energy budget of an interval at `speed_w` is `speed_w / calls_per_hour`; the
/// smaller of that and the headroom is converted back into a power value.
pub(crate) fn fill_power(remaining_wh: f64, speed_w: f64, calls_per_hour: f64) -> f64 {
    remaining_wh.min(speed_w / calls_per_hour) * calls_per_hour
}

/// Identifier of one of the four compared policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Uncontrolled,
    Preset,
    SurplusAll,
    SurplusNoSoc,
}

impl StrategyKind {
    /// All policies in reporting order.
    pub const ALL: [Self; 4] = [
        Self::Uncontrolled,
        Self::Preset,
        Self::SurplusAll,
        Self::SurplusNoSoc,
    ];

    /// Column prefix used in exported results.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncontrolled => "uncontrolled",
            Self::Preset => "preset",
            Self::SurplusAll => "surplus_all",
            Self::SurplusNoSoc => "surplus_no_soc",
        }
    }

    /// Human-readable name for reports.
    pub fn title(self) -> &'static str {
        match self {
            Self::Uncontrolled => "Uncontrolled charging",
            Self::Preset => "Preset charging",
            Self::SurplusAll => "Surplus charging with full information",
            Self::SurplusNoSoc => "Surplus charging without battery information",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of charging policies, dispatched statically.
#[derive(Debug, Clone)]
pub enum Strategy {
    Uncontrolled(UncontrolledCharging),
    Preset(PresetCharging),
    SurplusAll(SurplusCharging),
    SurplusNoSoc(SurplusCharging),
}

impl Strategy {
    /// Builds a fresh policy of the given kind from the configuration.
    ///
    /// Every call returns new internal state, so one simulation run should build
    /// its own set rather than reuse instances from an earlier run.
    pub fn from_config(kind: StrategyKind, config: &Configuration) -> Self {
        let calls_per_hour = f64::from(config.calls_per_hour);
        let maximum_charge_wh = config.maximum_charge();

        match kind {
            StrategyKind::Uncontrolled => Self::Uncontrolled(UncontrolledCharging::new(
                config.max_charging_speed,
                calls_per_hour,
                maximum_charge_wh,
            )),
            StrategyKind::Preset => Self::Preset(PresetCharging::new(
                config.preset_charging_speed,
                calls_per_hour,
                maximum_charge_wh,
                config.preset_start_time,
                config.preset_end_time,
            )),
            StrategyKind::SurplusAll => {
                Self::SurplusAll(SurplusCharging::full_information(config))
            }
            StrategyKind::SurplusNoSoc => {
                Self::SurplusNoSoc(SurplusCharging::without_soc_information(config))
            }
        }
    }

    /// Builds all four policies in [`StrategyKind::ALL`] order.
    pub fn all_from_config(config: &Configuration) -> Vec<Self> {
        StrategyKind::ALL
            .iter()
            .map(|&kind| Self::from_config(kind, config))
            .collect()
    }

    /// Returns which policy this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Uncontrolled(_) => StrategyKind::Uncontrolled,
            Self::Preset(_) => StrategyKind::Preset,
            Self::SurplusAll(_) => StrategyKind::SurplusAll,
            Self::SurplusNoSoc(_) => StrategyKind::SurplusNoSoc,
        }
    }
}

impl ChargingStrategy for Strategy {
    fn step(&mut self, input: &StepInput) -> f64 {
        match self {
            Self::Uncontrolled(s) => s.step(input),
            Self::Preset(s) => s.step(input),
            Self::SurplusAll(s) | Self::SurplusNoSoc(s) => s.step(input),
        }
    }
}
