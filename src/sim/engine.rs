//! Simulation engine that advances every charging policy through the reading stream.

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::charging::{ChargingStrategy, StepInput, Strategy, StrategyKind};
use crate::config::Configuration;

use super::types::{Reading, StepResult, StrategyOutcome};

/// A policy together with the battery charge it is responsible for.
#[derive(Debug, Clone)]
struct Lane {
    strategy: Strategy,
    charge_wh: f64,
}

/// Simulation engine owning the configuration and one battery per policy.
///
/// Each policy drives its own copy of the battery, so the policies can be
/// compared on identical inputs. The engine is the only writer of the
/// tracked charges. Build a fresh engine for every run: policies carry
/// memo state (lagged surplus, fixed minimum targets) across calls.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Configuration,
    lanes: Vec<Lane>,
}

impl Engine {
    /// Creates an engine with all four policies, each starting at the configured charge.
    pub fn new(config: Configuration) -> Self {
        let strategies = Strategy::all_from_config(&config);
        Self::with_strategies(config, strategies)
    }

    /// Creates an engine running only the given policies.
    pub fn with_strategies(config: Configuration, strategies: Vec<Strategy>) -> Self {
        let starting_charge_wh = config.starting_charge();
        let lanes = strategies
            .into_iter()
            .map(|strategy| Lane {
                strategy,
                charge_wh: starting_charge_wh,
            })
            .collect();
        Self { config, lanes }
    }

    /// Executes one interval and returns its record.
    ///
    /// Every policy decides on the same reading; its decided power, held for
    /// one interval, is added to that policy's tracked charge.
    ///
    /// # Arguments
    ///
    /// * `reading` - Sample for this interval
    /// * `window_end` - End of the day's active window, the charging deadline
    pub fn step(&mut self, reading: &Reading, window_end: NaiveTime) -> StepResult {
        let time = reading.time.time();
        let time_left_min = (window_end - time).num_milliseconds() as f64 / 60_000.0;
        let calls_per_hour = f64::from(self.config.calls_per_hour);
        let capacity_wh = self.config.capacity;

        let outcomes = self
            .lanes
            .iter_mut()
            .map(|lane| {
                let input = StepInput {
                    time_left_min,
                    current_charge_wh: lane.charge_wh,
                    time,
                    output_w: reading.output_w,
                    consumption_w: reading.consumption_w,
                };
                let charging_power_w = lane.strategy.step(&input);
                lane.charge_wh += charging_power_w / calls_per_hour;

                StrategyOutcome {
                    kind: lane.strategy.kind(),
                    charging_power_w,
                    soc_pct: lane.charge_wh / capacity_wh * 100.0,
                }
            })
            .collect();

        StepResult {
            time: reading.time,
            surplus_w: reading.surplus_w(),
            outcomes,
        }
    }

    /// Simulates one calendar day and applies the daily usage afterwards.
    ///
    /// Readings outside the day's active window are skipped: the car is not
    /// connected then. The daily usage is subtracted even if no reading fell
    /// inside the window.
    ///
    /// # Arguments
    ///
    /// * `date` - The simulated day
    /// * `readings` - That day's readings in ascending time order
    pub fn run_day(&mut self, date: NaiveDate, readings: &[Reading]) -> Vec<StepResult> {
        let (window_start, window_end) = self.config.active_window(date);

        let results: Vec<StepResult> = readings
            .iter()
            .filter(|r| {
                let t = r.time.time();
                window_start <= t && t <= window_end
            })
            .map(|r| self.step(r, window_end))
            .collect();

        debug!(
            %date,
            intervals = results.len(),
            skipped = readings.len() - results.len(),
            "simulated day"
        );

        self.end_day();
        results
    }

    /// Subtracts the daily usage from every tracked charge.
    pub fn end_day(&mut self) {
        for lane in &mut self.lanes {
            lane.charge_wh -= self.config.daily_usage;
        }
    }

    /// Runs the whole reading stream and returns one record per in-window interval.
    ///
    /// Readings outside the configured date range are ignored, the rest are
    /// stably sorted by time and grouped by calendar day. Days without any
    /// reading are not simulated at all. A run without a single in-window
    /// reading is reported as having no data for the configured range.
    pub fn run(&mut self, readings: &[Reading]) -> Vec<StepResult> {
        let mut selected: Vec<Reading> = readings
            .iter()
            .filter(|r| self.config.covers(r.time.date()))
            .copied()
            .collect();
        selected.sort_by_key(|r| r.time);

        let mut results = Vec::with_capacity(selected.len());
        let mut days = 0;
        for day in selected.chunk_by(|a, b| a.time.date() == b.time.date()) {
            let date = day[0].time.date();
            results.extend(self.run_day(date, day));
            days += 1;
        }

        if results.is_empty() {
            info!(
                days,
                "No data available between {} and {}.",
                self.config.start_date,
                self.config.end_date
            );
        } else {
            info!(days, intervals = results.len(), "simulation finished");
        }
        results
    }

    /// Returns the tracked charge of the given policy (Wh).
    pub fn charge_wh(&self, kind: StrategyKind) -> Option<f64> {
        self.lanes
            .iter()
            .find(|lane| lane.strategy.kind() == kind)
            .map(|lane| lane.charge_wh)
    }
}
