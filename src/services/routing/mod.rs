mod proxy_client;
mod synthetic;

pub use proxy_client::ProxyRoutingClient;
pub use synthetic::SyntheticRoutingProvider;

use crate::error::Result;
use crate::models::Coordinates;
use async_trait::async_trait;
use serde::Serialize;

/// Source of walking routes and reachability polygons.
///
/// Implementations must be safe to share between request handlers; the
/// generator calls them concurrently when fan-out is enabled.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Out-and-back walking route `start -> waypoint -> start`
    async fn get_route(&self, start: Coordinates, waypoint: Coordinates) -> Result<RouteResponse>;

    /// Area reachable on foot from `start` within `time_seconds`
    async fn get_isochrone(&self, start: Coordinates, time_seconds: f64)
        -> Result<IsochroneResponse>;

    /// Short identifier used in logs and the health endpoint
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteResponse {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON coordinates as [lng, lat] pairs
    pub geometry: Vec<[f64; 2]>,
}

impl RouteResponse {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds / 60.0
    }

    /// Convert GeoJSON positions, dropping any that are out of range
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        positions_to_coordinates(&self.geometry)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IsochroneResponse {
    /// Outer ring as [lng, lat] pairs
    pub polygon: Vec<[f64; 2]>,
    pub time_seconds: f64,
}

impl IsochroneResponse {
    pub fn to_coordinates(&self) -> Vec<Coordinates> {
        positions_to_coordinates(&self.polygon)
    }
}

fn positions_to_coordinates(positions: &[[f64; 2]]) -> Vec<Coordinates> {
    positions
        .iter()
        .filter_map(|p| Coordinates::from_lng_lat(*p).ok())
        .collect()
}
