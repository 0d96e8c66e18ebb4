use crate::config::ProviderKind;
use crate::constants::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::models::{BoundingBox, Coordinates, PaceSetting};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Everything one generation call needs. Built per request, never stored.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: Coordinates,
    pub target_duration_minutes: f64,
    pub pace: PaceSetting,
    /// Fingerprint lists of recently generated routes, most recent first
    pub recent_route_fingerprints: Vec<Vec<String>>,
}

impl RouteRequest {
    pub fn new(
        start: Coordinates,
        target_duration_minutes: f64,
        pace: PaceSetting,
        recent_route_fingerprints: Vec<Vec<String>>,
    ) -> Result<Self, String> {
        if !target_duration_minutes.is_finite() || target_duration_minutes <= 0.0 {
            return Err("target duration must be a positive number of minutes".to_string());
        }
        if !pace.pace_value.is_finite() || pace.pace_value <= 0.0 {
            return Err("pace must be a positive number".to_string());
        }
        Ok(RouteRequest {
            start,
            target_duration_minutes,
            pace,
            recent_route_fingerprints,
        })
    }

    pub fn target_distance_km(&self) -> f64 {
        self.pace.target_distance_km(self.target_duration_minutes)
    }
}

/// One out-and-back proposal. Lives only for the duration of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub coordinates: Vec<Coordinates>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fingerprints: Vec<String>,
    /// 0-1, how little this candidate repeats recent routes
    pub freshness: f64,
    /// Freshness until selection replaces it with the composite score
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Closed loop path, first point ~ last point
    pub coordinates: Vec<Coordinates>,
    pub start_point: Coordinates,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_favorite: bool,
    /// Segment fingerprints derived from `coordinates`
    pub fingerprints: Vec<String>,
}

impl Route {
    /// Promote a selected candidate to a route with a fresh id and timestamp
    pub fn from_candidate(candidate: RouteCandidate, start_point: Coordinates) -> Self {
        Route {
            id: Uuid::new_v4(),
            name: None,
            distance_km: candidate.distance_km,
            duration_minutes: candidate.duration_minutes,
            coordinates: candidate.coordinates,
            start_point,
            created_at: OffsetDateTime::now_utc(),
            is_favorite: false,
            fingerprints: candidate.fingerprints,
        }
    }
}

/// Which step of the fallback chain produced a route
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Isochrone,
    Radius,
    SyntheticRadius,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Isochrone => write!(f, "isochrone"),
            GenerationStage::Radius => write!(f, "radius"),
            GenerationStage::SyntheticRadius => write!(f, "synthetic_radius"),
        }
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct LoopRouteRequest {
    pub start_point: Coordinates,
    pub duration_minutes: f64,
    #[serde(default)]
    pub pace: PaceSetting,
    /// Overrides the server's configured provider for this call
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

impl LoopRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(format!(
                "duration_minutes must be between {} and {}",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
            ));
        }
        if !self.pace.pace_value.is_finite() || self.pace.pace_value <= 0.0 {
            return Err("pace_value must be positive".to_string());
        }
        Coordinates::new(self.start_point.lat, self.start_point.lng)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoopRouteResponse {
    pub route: Route,
    pub stage: GenerationStage,
    /// Envelope of the route geometry, for fitting a map view
    pub bounds: Option<BoundingBox>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FavoriteRequest {
    #[serde(default)]
    pub name: Option<String>,
}
