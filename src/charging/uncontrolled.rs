use super::{ChargingStrategy, StepInput, fill_power};

/// Charges at full speed whenever the car is connected.
///
/// This is what a plain wallbox does: no regard for PV surplus, only the
/// upper charge limit stops it.
#[derive(Debug, Clone)]
pub struct UncontrolledCharging {
    /// Charger speed (W).
    pub max_charging_speed_w: f64,
    calls_per_hour: f64,
    /// Charge level at which charging stops (Wh).
    pub maximum_charge_wh: f64,
}

impl UncontrolledCharging {
    /// Creates the policy.
    ///
    /// # Arguments
    ///
    /// * `max_charging_speed_w` - Charger speed (W)
    /// * `calls_per_hour` - Decision intervals per hour
    /// * `maximum_charge_wh` - Upper charge limit (Wh)
    pub fn new(max_charging_speed_w: f64, calls_per_hour: f64, maximum_charge_wh: f64) -> Self {
        Self {
            max_charging_speed_w,
            calls_per_hour,
            maximum_charge_wh,
        }
    }
}

impl ChargingStrategy for UncontrolledCharging {
    fn step(&mut self, input: &StepInput) -> f64 {
        if input.current_charge_wh >= self.maximum_charge_wh {
            return 0.0;
        }
        let remaining_wh = self.maximum_charge_wh - input.current_charge_wh;
        fill_power(remaining_wh, self.max_charging_speed_w, self.calls_per_hour)
    }
}
