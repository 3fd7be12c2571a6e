use chrono::NaiveTime;

use super::{ChargingStrategy, StepInput, fill_power};

/// Charges at a fixed speed inside a preset time window.
///
/// Models the timer function most wallboxes offer: the window is inclusive on
/// both ends and ignores PV surplus entirely.
#[derive(Debug, Clone)]
pub struct PresetCharging {
    /// Fixed charger speed inside the window (W).
    pub charging_speed_w: f64,
    calls_per_hour: f64,
    /// Charge level at which charging stops (Wh).
    pub maximum_charge_wh: f64,
    /// First moment of the window (inclusive).
    pub start_time: NaiveTime,
    /// Last moment of the window (inclusive).
    pub end_time: NaiveTime,
}

impl PresetCharging {
    /// Creates the policy.
    ///
    /// # Arguments
    ///
    /// * `charging_speed_w` - Fixed charger speed inside the window (W)
    /// * `calls_per_hour` - Decision intervals per hour
    /// * `maximum_charge_wh` - Upper charge limit (Wh)
    /// * `start_time` - Window start (inclusive)
    /// * `end_time` - Window end (inclusive)
    pub fn new(
        charging_speed_w: f64,
        calls_per_hour: f64,
        maximum_charge_wh: f64,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            charging_speed_w,
            calls_per_hour,
            maximum_charge_wh,
            start_time,
            end_time,
        }
    }

    /// Returns `true` when `time` falls inside the preset window.
    pub fn is_active(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

impl ChargingStrategy for PresetCharging {
    fn step(&mut self, input: &StepInput) -> f64 {
        if !self.is_active(input.time) || input.current_charge_wh >= self.maximum_charge_wh {
            return 0.0;
        }
        let remaining_wh = self.maximum_charge_wh - input.current_charge_wh;
        fill_power(remaining_wh, self.charging_speed_w, self.calls_per_hour)
    }
}
