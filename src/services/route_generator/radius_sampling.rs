use crate::config::RouteGeneratorConfig;
use crate::constants::KM_PER_DEGREE;
use crate::models::Coordinates;
use rand::rngs::StdRng;
use rand::RngExt;
use std::f64::consts::{PI, TAU};

/// Places waypoints on a jittered circle around the start.
///
/// An out-and-back walk to a point at distance `r` covers about `2r`, but real
/// paths wind, so the base radius is `target / pi` rather than `target / 2`.
pub struct RadiusSampler {
    waypoint_count: usize,
    variation_min: f64,
    variation_max: f64,
}

impl RadiusSampler {
    pub fn new(config: &RouteGeneratorConfig) -> Self {
        RadiusSampler {
            waypoint_count: config.radius_waypoint_count,
            variation_min: config.radius_variation_min,
            variation_max: config.radius_variation_max,
        }
    }

    pub fn base_radius_km(target_distance_km: f64) -> f64 {
        target_distance_km / PI
    }

    pub fn sample(
        &self,
        start: Coordinates,
        target_distance_km: f64,
        rng: &mut StdRng,
    ) -> Vec<Coordinates> {
        let base_radius_km = Self::base_radius_km(target_distance_km);
        // Bearings run clockwise from north: cos(angle) moves latitude and
        // sin(angle) longitude. A flat 111 km per degree holds for latitude
        // only; longitude degrees shrink with cos(lat), so the offset is
        // widened by 1/cos(lat) to keep the circle round away from the equator.
        let lng_scale = start.lat.to_radians().cos().max(0.01);

        let mut waypoints = Vec::with_capacity(self.waypoint_count);
        for i in 0..self.waypoint_count {
            let angle = (i as f64 / self.waypoint_count as f64) * TAU;
            let variation = rng.random_range(self.variation_min..=self.variation_max);
            let radius_deg = base_radius_km * variation / KM_PER_DEGREE;

            let lat = start.lat + radius_deg * angle.cos();
            let lng = start.lng + radius_deg * angle.sin() / lng_scale;

            match Coordinates::new(lat, lng) {
                Ok(waypoint) => waypoints.push(waypoint),
                Err(_) => {
                    tracing::warn!(
                        index = i,
                        lat = lat,
                        lng = lng,
                        "Radius sampling: invalid waypoint {} ({}, {}), skipping",
                        i,
                        lat,
                        lng
                    );
                }
            }
        }

        tracing::debug!(
            "Sampled {} radius waypoints (base radius: {:.2}km)",
            waypoints.len(),
            base_radius_km
        );

        waypoints
    }
}
