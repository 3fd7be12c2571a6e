use crate::config::Configuration;

use super::rounding::RoundingMode;
use super::{ChargingStrategy, StepInput, fill_power};

/// The charge level the deadline guarantee has to reach.
///
/// A controller without access to the battery's state of charge only knows how
/// much energy it should add. The first decision turns that relative target into
/// an absolute one, which then stays fixed for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinimumTarget {
    /// Energy to add on top of whatever the battery holds at the first decision (Wh).
    Relative { top_up_wh: f64 },
    /// Absolute minimum charge (Wh).
    Absolute(f64),
}

impl MinimumTarget {
    /// Resolves the target against the current charge and returns it.
    ///
    /// A relative target transitions to [`MinimumTarget::Absolute`], capped at
    /// `maximum_charge_wh`. Absolute targets are returned unchanged.
    fn resolve(&mut self, current_charge_wh: f64, maximum_charge_wh: f64) -> f64 {
        let absolute_wh = match *self {
            Self::Relative { top_up_wh } => (current_charge_wh + top_up_wh).min(maximum_charge_wh),
            Self::Absolute(wh) => wh,
        };
        *self = Self::Absolute(absolute_wh);
        absolute_wh
    }
}

/// Follows the PV surplus while guaranteeing a minimum charge by the end of the window.
///
/// Each decision runs through the same pipeline:
///
/// 1. Nothing happens once the battery holds `maximum_charge_wh`.
/// 2. The surplus is observed, optionally one interval late.
/// 3. If the time left cannot reach the minimum charge at full speed any more,
///    charge at full speed.
/// 4. Otherwise charge with the surplus, snapped to a supported speed.
#[derive(Debug, Clone)]
pub struct SurplusCharging {
    /// Charger speed limit (W).
    pub max_charging_speed_w: f64,
    calls_per_hour: f64,
    /// Charge level at which charging stops (Wh).
    pub maximum_charge_wh: f64,
    minimum: MinimumTarget,
    /// Act on the previous interval's surplus instead of the current one.
    pub delayed: bool,
    /// Lowest speed the charger can run at (W).
    pub min_speed_w: f64,
    /// Smallest power increment the charger accepts (W).
    pub step_size_w: f64,
    /// How surplus power maps onto charger speeds.
    pub rounding: RoundingMode,
    last_surplus_w: f64,
}

impl SurplusCharging {
    /// Creates the policy.
    ///
    /// # Arguments
    ///
    /// * `max_charging_speed_w` - Charger speed limit (W)
    /// * `calls_per_hour` - Decision intervals per hour
    /// * `minimum` - Charge level guaranteed by the end of the active window
    /// * `maximum_charge_wh` - Upper charge limit (Wh)
    /// * `delayed` - Observe the surplus one interval late
    /// * `min_speed_w` - Lowest speed the charger can run at (W)
    /// * `step_size_w` - Smallest power increment the charger accepts (W)
    /// * `rounding` - Surplus rounding mode
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        max_charging_speed_w: f64,
        calls_per_hour: f64,
        minimum: MinimumTarget,
        maximum_charge_wh: f64,
        delayed: bool,
        min_speed_w: f64,
        step_size_w: f64,
        rounding: RoundingMode,
    ) -> Self {
        Self {
            max_charging_speed_w,
            calls_per_hour,
            maximum_charge_wh,
            minimum,
            delayed,
            min_speed_w,
            step_size_w,
            rounding,
            last_surplus_w: 0.0,
        }
    }

    /// Surplus charging that knows the battery's absolute state of charge.
    pub fn full_information(config: &Configuration) -> Self {
        Self::from_config(config, MinimumTarget::Absolute(config.minimum_charge()))
    }

    /// Surplus charging that only knows how much energy to add.
    ///
    /// The configured minimum charge is read as a top-up on the charge seen at
    /// the first decision.
    pub fn without_soc_information(config: &Configuration) -> Self {
        Self::from_config(
            config,
            MinimumTarget::Relative {
                top_up_wh: config.minimum_charge(),
            },
        )
    }

    fn from_config(config: &Configuration, minimum: MinimumTarget) -> Self {
        Self::new(
            config.max_charging_speed,
            f64::from(config.calls_per_hour),
            minimum,
            config.maximum_charge(),
            config.surplus_charging_delayed,
            config.minimum_charge_speed,
            config.charge_step_size,
            config.step_mode.clone(),
        )
    }

    /// Absolute minimum charge, once known (Wh).
    ///
    /// Returns `None` for a relative target that has not seen its first decision yet.
    pub fn minimum_charge_wh(&self) -> Option<f64> {
        match self.minimum {
            MinimumTarget::Absolute(wh) => Some(wh),
            MinimumTarget::Relative { .. } => None,
        }
    }

    /// Returns the surplus to act on and remembers the current one.
    ///
    /// The raw difference is stored, so a negative surplus is remembered as such.
    fn observe_surplus(&mut self, output_w: f64, consumption_w: f64) -> f64 {
        let current_w = output_w - consumption_w;
        let observed_w = if self.delayed {
            self.last_surplus_w
        } else {
            current_w
        };
        self.last_surplus_w = current_w;
        observed_w
    }

    /// Full-speed charge when the deadline no longer leaves room to wait for surplus.
    ///
    /// Returns `None` while waiting is still safe.
    fn charge_to_minimum(
        &self,
        time_left_min: f64,
        current_charge_wh: f64,
        minimum_charge_wh: f64,
    ) -> Option<f64> {
        let required_hours = (minimum_charge_wh - current_charge_wh) / self.max_charging_speed_w;
        if time_left_min <= required_hours * 60.0 {
            let remaining_wh = (self.maximum_charge_wh - current_charge_wh).max(0.0);
            Some(fill_power(
                remaining_wh,
                self.max_charging_speed_w,
                self.calls_per_hour,
            ))
        } else {
            None
        }
    }

    fn charge_surplus(&self, surplus_w: f64, current_charge_wh: f64) -> f64 {
        if surplus_w <= 0.0 {
            return 0.0;
        }
        let charge_in_interval_wh = surplus_w / self.calls_per_hour;
        let remaining_wh = self.maximum_charge_wh - current_charge_wh;
        if remaining_wh < charge_in_interval_wh {
            return remaining_wh * self.calls_per_hour;
        }
        self.rounding
            .apply(surplus_w, self.step_size_w, self.min_speed_w)
            .min(self.max_charging_speed_w)
    }
}

impl ChargingStrategy for SurplusCharging {
    fn step(&mut self, input: &StepInput) -> f64 {
        let minimum_charge_wh = self
            .minimum
            .resolve(input.current_charge_wh, self.maximum_charge_wh);
        if input.current_charge_wh >= self.maximum_charge_wh {
            return 0.0;
        }
        let surplus_w = self.observe_surplus(input.output_w, input.consumption_w);
        self.charge_to_minimum(input.time_left_min, input.current_charge_wh, minimum_charge_wh)
            .unwrap_or_else(|| self.charge_surplus(surplus_w, input.current_charge_wh))
    }
}
