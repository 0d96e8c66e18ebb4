use super::{with_timeout, StageError};
use crate::config::RouteGeneratorConfig;
use crate::models::{Coordinates, RouteCandidate};
use crate::services::routing::{RouteResponse, RoutingProvider};
use crate::services::variety::{segmentize, VarietyScorer};
use futures::stream::{self, StreamExt};
use std::time::Duration;

/// Turns sampled waypoints into scored out-and-back candidates
pub struct CandidateBuilder {
    max_concurrent_requests: usize,
    request_timeout: Duration,
    scorer: VarietyScorer,
}

impl CandidateBuilder {
    pub fn new(config: &RouteGeneratorConfig) -> Self {
        CandidateBuilder {
            max_concurrent_requests: config.max_concurrent_requests.max(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            scorer: VarietyScorer::new(config.recency_decay),
        }
    }

    /// One routing request per waypoint. Failed waypoints are logged and
    /// skipped; surviving candidates keep waypoint order.
    pub async fn build(
        &self,
        provider: &dyn RoutingProvider,
        start: Coordinates,
        waypoints: &[Coordinates],
        history: &[Vec<String>],
    ) -> Vec<RouteCandidate> {
        let outcomes: Vec<Result<RouteCandidate, StageError>> =
            stream::iter(waypoints.iter().copied())
                .map(|waypoint| self.build_one(provider, start, waypoint, history))
                .buffered(self.max_concurrent_requests)
                .collect()
                .await;

        let mut candidates = Vec::with_capacity(outcomes.len());
        for (waypoint, outcome) in waypoints.iter().zip(outcomes) {
            match outcome {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        lat = waypoint.lat,
                        lng = waypoint.lng,
                        "Failed to build route for waypoint ({}, {}): {}",
                        waypoint.lat,
                        waypoint.lng,
                        e
                    );
                }
            }
        }

        tracing::debug!(
            provider = provider.name(),
            "Built {}/{} candidates",
            candidates.len(),
            waypoints.len()
        );

        candidates
    }

    async fn build_one(
        &self,
        provider: &dyn RoutingProvider,
        start: Coordinates,
        waypoint: Coordinates,
        history: &[Vec<String>],
    ) -> Result<RouteCandidate, StageError> {
        let response =
            with_timeout(self.request_timeout, provider.get_route(start, waypoint)).await?;
        self.to_candidate(&response, history)
    }

    fn to_candidate(
        &self,
        response: &RouteResponse,
        history: &[Vec<String>],
    ) -> Result<RouteCandidate, StageError> {
        let coordinates = response.to_coordinates();
        if coordinates.len() < 2 {
            return Err(StageError::MalformedRoute(format!(
                "geometry has {} usable points",
                coordinates.len()
            )));
        }

        let distance_km = response.distance_km();
        let duration_minutes = response.duration_minutes();
        if !(distance_km > 0.0 && duration_minutes > 0.0) {
            return Err(StageError::MalformedRoute(format!(
                "non-positive distance ({}) or duration ({})",
                distance_km, duration_minutes
            )));
        }

        let fingerprints = segmentize(&coordinates);
        let freshness = self.scorer.score(&fingerprints, history);

        Ok(RouteCandidate {
            coordinates,
            distance_km,
            duration_minutes,
            fingerprints,
            freshness,
            score: freshness,
        })
    }
}
