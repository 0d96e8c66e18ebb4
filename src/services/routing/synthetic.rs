use super::{IsochroneResponse, RouteResponse, RoutingProvider};
use crate::constants::{
    DEFAULT_PACE_MIN_PER_KM, KM_PER_DEGREE, SYNTHETIC_ISOCHRONE_POINTS,
    SYNTHETIC_WALKING_SPEED_KMH,
};
use crate::error::Result;
use crate::models::pace::distance_to_time;
use crate::models::{path_length_km, Coordinates};
use crate::services::random::seeded_rng;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f64::consts::{PI, TAU};
use std::sync::Mutex;

/// Lateral noise applied to every interior path point (degrees)
const PATH_NOISE_DEG: f64 = 0.002;

/// Chance that an interior point is pushed sideways to mimic a turn
const TURN_PROBABILITY: f64 = 0.3;

/// Offline provider producing plausible-looking geometry around the start.
///
/// Paths wander along the straight line to the waypoint and back; isochrones
/// are a jittered circle sized for a 5 km/h walk. No network access.
pub struct SyntheticRoutingProvider {
    rng: Mutex<StdRng>,
}

impl SyntheticRoutingProvider {
    pub fn new(seed: Option<u64>) -> Self {
        SyntheticRoutingProvider {
            rng: Mutex::new(seeded_rng(seed)),
        }
    }

    pub fn route(&self, start: Coordinates, waypoint: Coordinates) -> RouteResponse {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let mut geometry = wandering_path(&mut rng, start.to_lng_lat(), waypoint.to_lng_lat());
        let back = wandering_path(&mut rng, waypoint.to_lng_lat(), start.to_lng_lat());
        geometry.extend(back.into_iter().skip(1));

        let path: Vec<Coordinates> = geometry
            .iter()
            .map(|p| Coordinates { lat: p[1], lng: p[0] })
            .collect();
        let distance_km = path_length_km(&path);

        RouteResponse {
            distance_meters: distance_km * 1000.0,
            duration_seconds: distance_to_time(distance_km, DEFAULT_PACE_MIN_PER_KM) * 60.0,
            geometry,
        }
    }

    pub fn isochrone(&self, start: Coordinates, time_seconds: f64) -> IsochroneResponse {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let radius_km = (time_seconds / 60.0) * SYNTHETIC_WALKING_SPEED_KMH / 60.0;
        let radius_deg = radius_km / KM_PER_DEGREE;

        let mut polygon: Vec<[f64; 2]> = (0..SYNTHETIC_ISOCHRONE_POINTS)
            .map(|i| {
                let angle = (i as f64 / SYNTHETIC_ISOCHRONE_POINTS as f64) * TAU;
                let r = radius_deg * rng.random_range(0.7..=1.3);
                [start.lng + angle.cos() * r, start.lat + angle.sin() * r]
            })
            .collect();

        if let Some(first) = polygon.first().copied() {
            polygon.push(first);
        }

        IsochroneResponse {
            polygon,
            time_seconds,
        }
    }
}

impl Default for SyntheticRoutingProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl RoutingProvider for SyntheticRoutingProvider {
    async fn get_route(&self, start: Coordinates, waypoint: Coordinates) -> Result<RouteResponse> {
        Ok(self.route(start, waypoint))
    }

    async fn get_isochrone(
        &self,
        start: Coordinates,
        time_seconds: f64,
    ) -> Result<IsochroneResponse> {
        Ok(self.isochrone(start, time_seconds))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Noisy polyline from `from` to `to` in [lng, lat] order, endpoints exact
fn wandering_path(rng: &mut StdRng, from: [f64; 2], to: [f64; 2]) -> Vec<[f64; 2]> {
    let legs = rng.random_range(8..16);
    let mut points = Vec::with_capacity(legs + 1);
    points.push(from);

    for i in 1..legs {
        let t = i as f64 / legs as f64;
        let mut lng = from[0] + (to[0] - from[0]) * t;
        let mut lat = from[1] + (to[1] - from[1]) * t;

        lng += (rng.random::<f64>() - 0.5) * PATH_NOISE_DEG;
        lat += (rng.random::<f64>() - 0.5) * PATH_NOISE_DEG;

        if rng.random::<f64>() < TURN_PROBABILITY {
            let turn_angle = (rng.random::<f64>() - 0.5) * PI / 3.0;
            let turn_distance = 0.001 + rng.random::<f64>() * 0.002;
            lng += turn_angle.cos() * turn_distance;
            lat += turn_angle.sin() * turn_distance;
        }

        points.push([lng, lat]);
    }

    points.push(to);
    points
}
