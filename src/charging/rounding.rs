//! Mapping of raw surplus power onto the charging speeds the hardware supports.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How a surplus is snapped to a multiple of the charge step size.
///
/// Parsed from the `step_mode` configuration string. Any string other than
/// `round_up`, `round_down` or `balanced` becomes [`RoundingMode::Passthrough`],
/// which hands the surplus back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RoundingMode {
    /// Smallest step multiple at or above the surplus, never below the minimum speed.
    RoundUp,
    /// Largest step multiple at or below the surplus, or zero below the minimum speed.
    RoundDown,
    /// Whichever of up and down lies closer to the surplus; ties go up.
    #[default]
    Balanced,
    /// Unrecognised mode, carries the original string.
    Passthrough(String),
}

impl RoundingMode {
    /// Returns `true` when the configured mode string was not recognised.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough(_))
    }

    /// Snaps `surplus_w` to a supported charging speed.
    ///
    /// # Arguments
    ///
    /// * `surplus_w` - Raw surplus power (W)
    /// * `step_size_w` - Smallest power increment the charger accepts (W)
    /// * `min_speed_w` - Lowest power the charger can run at (W)
    pub fn apply(&self, surplus_w: f64, step_size_w: f64, min_speed_w: f64) -> f64 {
        match self {
            Self::RoundUp => round_up(surplus_w, step_size_w, min_speed_w),
            Self::RoundDown => round_down(surplus_w, step_size_w, min_speed_w),
            Self::Balanced => round_balanced(surplus_w, step_size_w, min_speed_w),
            Self::Passthrough(_) => surplus_w,
        }
    }
}

impl From<String> for RoundingMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "round_up" => Self::RoundUp,
            "round_down" => Self::RoundDown,
            "balanced" => Self::Balanced,
            _ => Self::Passthrough(value),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundUp => f.write_str("round_up"),
            Self::RoundDown => f.write_str("round_down"),
            Self::Balanced => f.write_str("balanced"),
            Self::Passthrough(raw) => f.write_str(raw),
        }
    }
}

/// Smallest multiple of `step_size_w` covering `max(surplus_w, min_speed_w)`.
pub fn round_up(surplus_w: f64, step_size_w: f64, min_speed_w: f64) -> f64 {
    let stepped = (surplus_w.max(min_speed_w) / step_size_w).ceil() * step_size_w;
    stepped.max(min_speed_w)
}

/// Largest multiple of `step_size_w` not above `surplus_w`.
///
/// Charging below the minimum speed is not possible, so such results drop to zero.
pub fn round_down(surplus_w: f64, step_size_w: f64, min_speed_w: f64) -> f64 {
    let stepped = (surplus_w / step_size_w).floor() * step_size_w;
    if stepped >= min_speed_w { stepped } else { 0.0 }
}

/// Picks the closer of [`round_up`] and [`round_down`], preferring up on a tie.
pub fn round_balanced(surplus_w: f64, step_size_w: f64, min_speed_w: f64) -> f64 {
    let up = round_up(surplus_w, step_size_w, min_speed_w);
    let down = round_down(surplus_w, step_size_w, min_speed_w);
    if (down - surplus_w).abs() < (up - surplus_w).abs() {
        down
    } else {
        up
    }
}
