use crate::constants::{DEFAULT_PACE_MIN_PER_KM, KM_PER_MILE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a pace (and displayed distance) is expressed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

impl DistanceUnit {
    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Metric => "km",
            DistanceUnit::Imperial => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Metric => write!(f, "metric"),
            DistanceUnit::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "km" => Ok(DistanceUnit::Metric),
            "imperial" | "mi" | "miles" => Ok(DistanceUnit::Imperial),
            _ => Err(format!("Invalid distance unit: '{}'", s)),
        }
    }
}

/// Walking pace in minutes per distance unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PaceSetting {
    #[serde(default)]
    pub unit: DistanceUnit,
    pub pace_value: f64,
}

impl Default for PaceSetting {
    fn default() -> Self {
        PaceSetting {
            unit: DistanceUnit::Metric,
            pace_value: DEFAULT_PACE_MIN_PER_KM,
        }
    }
}

impl PaceSetting {
    pub fn new(unit: DistanceUnit, pace_value: f64) -> Result<Self, String> {
        if !pace_value.is_finite() || pace_value <= 0.0 {
            return Err("Pace must be a positive number".to_string());
        }
        Ok(PaceSetting { unit, pace_value })
    }

    /// Loop distance in kilometers covered in `duration_minutes` at this pace
    pub fn target_distance_km(&self, duration_minutes: f64) -> f64 {
        let distance = time_to_distance(duration_minutes, self.pace_value);
        convert_distance(distance, self.unit, DistanceUnit::Metric)
    }
}

impl fmt::Display for PaceSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_pace(self.pace_value, self.unit))
    }
}

/// A named pace shown as a quick choice
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PacePreset {
    pub label: &'static str,
    pub pace_value: f64,
}

const METRIC_PRESETS: [PacePreset; 4] = [
    PacePreset { label: "Leisurely", pace_value: 15.0 }, // 4 km/h
    PacePreset { label: "Moderate", pace_value: 12.0 },  // 5 km/h
    PacePreset { label: "Brisk", pace_value: 10.0 },     // 6 km/h
    PacePreset { label: "Fast", pace_value: 8.5 },
];

const IMPERIAL_PRESETS: [PacePreset; 4] = [
    PacePreset { label: "Leisurely", pace_value: 24.0 }, // 2.5 mph
    PacePreset { label: "Moderate", pace_value: 19.3 },
    PacePreset { label: "Brisk", pace_value: 16.0 },
    PacePreset { label: "Fast", pace_value: 13.7 },
];

pub fn pace_presets(unit: DistanceUnit) -> &'static [PacePreset] {
    match unit {
        DistanceUnit::Metric => &METRIC_PRESETS,
        DistanceUnit::Imperial => &IMPERIAL_PRESETS,
    }
}

/// Distance covered in `minutes` at `pace` (same distance unit as the pace)
pub fn time_to_distance(minutes: f64, pace: f64) -> f64 {
    minutes / pace
}

/// Minutes needed for `distance` at `pace`
pub fn distance_to_time(distance: f64, pace: f64) -> f64 {
    distance * pace
}

pub fn convert_distance(distance: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    match (from, to) {
        (DistanceUnit::Metric, DistanceUnit::Imperial) => distance / KM_PER_MILE,
        (DistanceUnit::Imperial, DistanceUnit::Metric) => distance * KM_PER_MILE,
        _ => distance,
    }
}

/// Minutes per km <-> minutes per mile. A mile takes longer, so the
/// factor runs opposite to `convert_distance`.
pub fn convert_pace(pace: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    match (from, to) {
        (DistanceUnit::Metric, DistanceUnit::Imperial) => pace * KM_PER_MILE,
        (DistanceUnit::Imperial, DistanceUnit::Metric) => pace / KM_PER_MILE,
        _ => pace,
    }
}

/// "5.12 km", "3 mi"
pub fn format_distance(distance: f64, unit: DistanceUnit) -> String {
    let rounded = (distance * 100.0).round() / 100.0;
    format!("{} {}", rounded, unit.label())
}

/// "45m", "1h 30m"
pub fn format_time(minutes: f64) -> String {
    let total = minutes.round() as i64;
    let hours = total / 60;
    let mins = total % 60;

    if hours == 0 {
        format!("{}m", mins)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// "10:30/km"
pub fn format_pace(pace: f64, unit: DistanceUnit) -> String {
    let mut minutes = pace.floor() as i64;
    let mut seconds = ((pace - pace.floor()) * 60.0).round() as i64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02}/{}", minutes, seconds, unit.label())
}
