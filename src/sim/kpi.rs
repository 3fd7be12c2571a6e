//! Post-hoc cost evaluation of simulation results.

use std::fmt;

use crate::charging::StrategyKind;

use super::types::StepResult;

/// Energy prices used to value charged energy (currency per kWh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    /// Value of self-consumed PV energy, i.e. the feed-in tariff given up.
    pub solar_per_kwh: f64,
    /// Price of energy drawn from the grid.
    pub grid_per_kwh: f64,
}

impl Default for Prices {
    fn default() -> Self {
        Self {
            solar_per_kwh: 0.097,
            grid_per_kwh: 0.33,
        }
    }
}

/// Energy split and cost of one policy over a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyCost {
    /// Which policy.
    pub kind: StrategyKind,
    /// Charged energy covered by the PV surplus (kWh).
    pub pv_energy_kwh: f64,
    /// Charged energy drawn from the grid (kWh).
    pub grid_energy_kwh: f64,
    /// PV energy valued at the solar price.
    pub pv_cost: f64,
    /// Grid energy valued at the grid price.
    pub grid_cost: f64,
}

impl StrategyCost {
    /// Total charged energy (kWh).
    pub fn total_energy_kwh(&self) -> f64 {
        self.pv_energy_kwh + self.grid_energy_kwh
    }

    /// Total cost of the charged energy.
    pub fn total_cost(&self) -> f64 {
        self.pv_cost + self.grid_cost
    }

    /// Share of charged energy that came from PV (%), zero if nothing was charged.
    pub fn pv_share_pct(&self) -> f64 {
        let total = self.total_energy_kwh();
        if total > 0.0 {
            self.pv_energy_kwh / total * 100.0
        } else {
            0.0
        }
    }
}

/// Cost comparison of all policies, computed from the complete result series.
#[derive(Debug, Clone)]
pub struct CostReport {
    /// One entry per policy, in [`StrategyKind::ALL`] order.
    pub strategies: Vec<StrategyCost>,
}

impl CostReport {
    /// Splits every policy's charged energy into PV and grid parts and prices them.
    ///
    /// Power up to the interval's surplus counts as PV energy, anything above
    /// it as grid energy.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation results
    /// * `interval_hours` - Duration of one interval in hours
    /// * `prices` - Energy prices per kWh
    pub fn from_results(results: &[StepResult], interval_hours: f64, prices: Prices) -> Self {
        let strategies = StrategyKind::ALL
            .iter()
            .map(|&kind| {
                let mut pv_wh = 0.0_f64;
                let mut grid_wh = 0.0_f64;
                for r in results {
                    let Some(outcome) = r.outcome(kind) else {
                        continue;
                    };
                    let power_w = outcome.charging_power_w;
                    pv_wh += power_w.min(r.surplus_w) * interval_hours;
                    grid_wh += (power_w - r.surplus_w).max(0.0) * interval_hours;
                }

                let pv_energy_kwh = pv_wh / 1000.0;
                let grid_energy_kwh = grid_wh / 1000.0;
                StrategyCost {
                    kind,
                    pv_energy_kwh,
                    grid_energy_kwh,
                    pv_cost: pv_energy_kwh * prices.solar_per_kwh,
                    grid_cost: grid_energy_kwh * prices.grid_per_kwh,
                }
            })
            .collect();

        Self { strategies }
    }

    /// Returns the cost entry of the given policy.
    pub fn get(&self, kind: StrategyKind) -> Option<&StrategyCost> {
        self.strategies.iter().find(|s| s.kind == kind)
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Cost Report ---")?;
        for (i, s) in self.strategies.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", s.kind.title())?;
            writeln!(f, "  PV energy:     {:.2} kWh", s.pv_energy_kwh)?;
            writeln!(f, "  Grid energy:   {:.2} kWh", s.grid_energy_kwh)?;
            writeln!(f, "  Total energy:  {:.2} kWh", s.total_energy_kwh())?;
            writeln!(f, "  PV share:      {:.2}%", s.pv_share_pct())?;
            writeln!(f, "  PV cost:       {:.2}", s.pv_cost)?;
            writeln!(f, "  Grid cost:     {:.2}", s.grid_cost)?;
            write!(f, "  Total cost:    {:.2}", s.total_cost())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::StrategyOutcome;
    use chrono::NaiveDate;

    fn make_result(surplus_w: f64, power_w: f64) -> StepResult {
        StepResult {
            time: NaiveDate::from_ymd_opt(2024, 7, 12)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap_or_default(),
            surplus_w,
            outcomes: StrategyKind::ALL
                .iter()
                .map(|&kind| StrategyOutcome {
                    kind,
                    charging_power_w: power_w,
                    soc_pct: 50.0,
                })
                .collect(),
        }
    }

    #[test]
    fn splits_power_at_surplus() {
        // 3 kW charging on 1 kW surplus for one hour: 1 kWh PV, 2 kWh grid
        let results = vec![make_result(1000.0, 3000.0)];
        let report = CostReport::from_results(&results, 1.0, Prices::default());
        let cost = report.get(StrategyKind::Uncontrolled).copied();
        assert_eq!(cost.map(|c| c.pv_energy_kwh), Some(1.0));
        assert_eq!(cost.map(|c| c.grid_energy_kwh), Some(2.0));
    }

    #[test]
    fn charging_below_surplus_is_all_pv() {
        let results = vec![make_result(5000.0, 1200.0); 12];
        let report = CostReport::from_results(&results, 1.0 / 12.0, Prices::default());
        let cost = report.get(StrategyKind::SurplusAll).copied();
        assert!(cost.is_some_and(|c| (c.pv_energy_kwh - 1.2).abs() < 1e-9));
        assert!(cost.is_some_and(|c| c.grid_energy_kwh == 0.0));
        assert!(cost.is_some_and(|c| (c.pv_share_pct() - 100.0).abs() < 1e-9));
    }

    #[test]
    fn prices_applied() {
        let prices = Prices {
            solar_per_kwh: 0.1,
            grid_per_kwh: 0.3,
        };
        let results = vec![make_result(1000.0, 3000.0)];
        let report = CostReport::from_results(&results, 1.0, prices);
        let cost = report.get(StrategyKind::Preset).copied();
        assert!(cost.is_some_and(|c| (c.total_cost() - 0.7).abs() < 1e-9));
    }

    #[test]
    fn empty_results() {
        let report = CostReport::from_results(&[], 1.0 / 12.0, Prices::default());
        assert_eq!(report.strategies.len(), 4);
        for s in &report.strategies {
            assert_eq!(s.total_energy_kwh(), 0.0);
            assert_eq!(s.pv_share_pct(), 0.0);
        }
    }

    #[test]
    fn report_display_names_every_strategy() {
        let report = CostReport::from_results(&[make_result(500.0, 500.0)], 1.0, Prices::default());
        let text = report.to_string();
        for kind in StrategyKind::ALL {
            assert!(text.contains(kind.title()));
        }
    }
}
