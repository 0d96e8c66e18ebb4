use crate::error::{AppError, Result};
use crate::models::pace::{convert_pace, format_pace, pace_presets};
use crate::models::DistanceUnit;
use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PresetQuery {
    pub unit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PresetEntry {
    pub label: &'static str,
    pub unit: DistanceUnit,
    pub pace_value: f64,
    pub pace_min_per_km: f64,
    /// e.g. "12:00/km"
    pub display: String,
}

/// GET /pace/presets?unit=metric|imperial
pub async fn list_presets(Query(query): Query<PresetQuery>) -> Result<Json<Vec<PresetEntry>>> {
    let unit = match query.unit.as_deref() {
        Some(raw) => raw.parse::<DistanceUnit>().map_err(AppError::InvalidRequest)?,
        None => DistanceUnit::default(),
    };

    Ok(Json(
        pace_presets(unit)
            .iter()
            .map(|preset| PresetEntry {
                label: preset.label,
                unit,
                pace_value: preset.pace_value,
                pace_min_per_km: convert_pace(preset.pace_value, unit, DistanceUnit::Metric),
                display: format_pace(preset.pace_value, unit),
            })
            .collect(),
    ))
}
