//! Core simulation records: input readings and per-interval results.

use std::fmt;

use chrono::NaiveDateTime;

use crate::charging::StrategyKind;

/// One recorded sample of PV production and household consumption.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pv_charge_sim::sim::types::Reading;
///
/// let time = NaiveDate::from_ymd_opt(2024, 7, 12)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .unwrap_or_default();
/// let r = Reading::new(time, 3_000.0, 800.0);
/// assert_eq!(r.surplus_w(), 2_200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Wall clock time of the sample.
    pub time: NaiveDateTime,
    /// PV production (W).
    pub output_w: f64,
    /// Household consumption (W).
    pub consumption_w: f64,
}

impl Reading {
    /// Creates a reading.
    pub fn new(time: NaiveDateTime, output_w: f64, consumption_w: f64) -> Self {
        Self {
            time,
            output_w,
            consumption_w,
        }
    }

    /// Production minus consumption, floored at zero (W).
    pub fn surplus_w(&self) -> f64 {
        (self.output_w - self.consumption_w).max(0.0)
    }
}

/// One policy's decision and resulting state for one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyOutcome {
    /// Which policy decided.
    pub kind: StrategyKind,
    /// Charging power held for the interval (W).
    pub charging_power_w: f64,
    /// State of charge after the interval (% of capacity).
    pub soc_pct: f64,
}

/// Complete record of one in-window interval.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Time of the reading.
    pub time: NaiveDateTime,
    /// Surplus floored at zero (W).
    pub surplus_w: f64,
    /// One outcome per policy, in [`StrategyKind::ALL`] order.
    pub outcomes: Vec<StrategyOutcome>,
}

impl StepResult {
    /// Returns the outcome of the given policy.
    pub fn outcome(&self, kind: StrategyKind) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | surplus={:>7.0} W", self.time, self.surplus_w)?;
        for o in &self.outcomes {
            write!(
                f,
                " | {}={:>6.0} W ({:>5.1}%)",
                o.kind, o.charging_power_w, o.soc_pct
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 12)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    #[test]
    fn surplus_floored_at_zero() {
        assert_eq!(Reading::new(noon(), 200.0, 900.0).surplus_w(), 0.0);
        assert_eq!(Reading::new(noon(), 900.0, 200.0).surplus_w(), 700.0);
    }

    #[test]
    fn outcome_lookup_by_kind() {
        let r = StepResult {
            time: noon(),
            surplus_w: 500.0,
            outcomes: StrategyKind::ALL
                .iter()
                .enumerate()
                .map(|(i, &kind)| StrategyOutcome {
                    kind,
                    charging_power_w: i as f64 * 100.0,
                    soc_pct: 50.0,
                })
                .collect(),
        };
        assert_eq!(
            r.outcome(StrategyKind::SurplusAll).map(|o| o.charging_power_w),
            Some(200.0)
        );
    }

    #[test]
    fn step_result_display_does_not_panic() {
        let r = StepResult {
            time: noon(),
            surplus_w: 500.0,
            outcomes: vec![StrategyOutcome {
                kind: StrategyKind::Preset,
                charging_power_w: 4000.0,
                soc_pct: 51.2,
            }],
        };
        let s = format!("{r}");
        assert!(s.contains("preset"));
    }
}
