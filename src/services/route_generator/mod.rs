mod candidate_builder;
mod candidate_selection;
mod isochrone_sampling;
mod radius_sampling;

pub use candidate_builder::CandidateBuilder;
pub use candidate_selection::CandidateSelector;
pub use isochrone_sampling::IsochroneSampler;
pub use radius_sampling::RadiusSampler;

use crate::config::RouteGeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, GenerationStage, Route, RouteRequest};
use crate::services::random::seeded_rng;
use crate::services::routing::RoutingProvider;
use rand::rngs::StdRng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a single stage of the fallback chain produced no route
#[derive(Error, Debug)]
pub enum StageError {
    #[error("isochrone polygon has {points} points")]
    InvalidIsochrone { points: usize },

    #[error("no candidates survived the {stage} stage")]
    NoCandidates { stage: GenerationStage },

    #[error("malformed route: {0}")]
    MalformedRoute(String),

    #[error(transparent)]
    Provider(#[from] AppError),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Await a provider call, turning an elapsed deadline into a stage error
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> std::result::Result<T, StageError>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(StageError::from),
        Err(_) => Err(StageError::Timeout {
            seconds: timeout.as_secs(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedRoute {
    pub route: Route,
    pub stage: GenerationStage,
    /// Candidates scored in the stage that produced the route
    pub candidates_considered: usize,
}

/// Runs the three-stage fallback chain:
/// isochrone sampling, radius sampling, then radius sampling against the
/// offline provider. Each stage runs at most once per request.
pub struct RouteGenerator {
    config: RouteGeneratorConfig,
    fallback: Arc<dyn RoutingProvider>,
    isochrone_sampler: IsochroneSampler,
    radius_sampler: RadiusSampler,
    builder: CandidateBuilder,
    selector: CandidateSelector,
}

impl RouteGenerator {
    pub fn new(config: RouteGeneratorConfig, fallback: Arc<dyn RoutingProvider>) -> Self {
        RouteGenerator {
            isochrone_sampler: IsochroneSampler::new(&config),
            radius_sampler: RadiusSampler::new(&config),
            builder: CandidateBuilder::new(&config),
            selector: CandidateSelector::new(config.freshness_weight),
            config,
            fallback,
        }
    }

    pub fn config(&self) -> &RouteGeneratorConfig {
        &self.config
    }

    pub fn fallback_provider(&self) -> &Arc<dyn RoutingProvider> {
        &self.fallback
    }

    /// Generate a loop with a fresh random generator (or the configured seed)
    pub async fn generate_loop_route(
        &self,
        request: &RouteRequest,
        provider: &dyn RoutingProvider,
    ) -> Option<Route> {
        let mut rng = seeded_rng(self.config.random_seed);
        self.generate(request, provider, &mut rng)
            .await
            .map(|generated| generated.route)
    }

    /// Walk the fallback chain until a stage yields a route.
    /// `None` only when the offline stage also comes up empty.
    pub async fn generate(
        &self,
        request: &RouteRequest,
        provider: &dyn RoutingProvider,
        rng: &mut StdRng,
    ) -> Option<GeneratedRoute> {
        tracing::info!(
            provider = provider.name(),
            lat = request.start.lat,
            lng = request.start.lng,
            "Generating {}min loop (~{:.2}km)",
            request.target_duration_minutes,
            request.target_distance_km()
        );

        match self.isochrone_stage(request, provider, rng).await {
            Ok(generated) => return Some(generated),
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    "Isochrone routing failed, trying radius heuristic: {}",
                    e
                );
            }
        }

        match self
            .radius_stage(request, provider, GenerationStage::Radius, rng)
            .await
        {
            Ok(generated) => return Some(generated),
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    fallback = self.fallback.name(),
                    "Radius routing failed, using offline provider: {}",
                    e
                );
            }
        }

        match self
            .radius_stage(
                request,
                self.fallback.as_ref(),
                GenerationStage::SyntheticRadius,
                rng,
            )
            .await
        {
            Ok(generated) => Some(generated),
            Err(e) => {
                tracing::error!(
                    fallback = self.fallback.name(),
                    "All route generation stages failed: {}",
                    e
                );
                None
            }
        }
    }

    async fn isochrone_stage(
        &self,
        request: &RouteRequest,
        provider: &dyn RoutingProvider,
        rng: &mut StdRng,
    ) -> std::result::Result<GeneratedRoute, StageError> {
        // Half the walk is spent getting out to the waypoint
        let outbound_seconds = request.target_duration_minutes * 60.0 / 2.0;

        let isochrone = with_timeout(
            self.request_timeout(),
            provider.get_isochrone(request.start, outbound_seconds),
        )
        .await?;

        let polygon = isochrone.to_coordinates();
        let waypoints = self.isochrone_sampler.sample(&polygon, rng)?;

        self.finish_stage(request, provider, &waypoints, GenerationStage::Isochrone)
            .await
    }

    async fn radius_stage(
        &self,
        request: &RouteRequest,
        provider: &dyn RoutingProvider,
        stage: GenerationStage,
        rng: &mut StdRng,
    ) -> std::result::Result<GeneratedRoute, StageError> {
        let waypoints = self
            .radius_sampler
            .sample(request.start, request.target_distance_km(), rng);

        self.finish_stage(request, provider, &waypoints, stage).await
    }

    async fn finish_stage(
        &self,
        request: &RouteRequest,
        provider: &dyn RoutingProvider,
        waypoints: &[Coordinates],
        stage: GenerationStage,
    ) -> std::result::Result<GeneratedRoute, StageError> {
        let candidates = self
            .builder
            .build(
                provider,
                request.start,
                waypoints,
                &request.recent_route_fingerprints,
            )
            .await;
        let candidates_considered = candidates.len();

        let route = self
            .selector
            .select(candidates, request)
            .ok_or(StageError::NoCandidates { stage })?;

        tracing::info!(
            stage = %stage,
            candidates = candidates_considered,
            "Loop route generated: {:.2}km, {:.1}min",
            route.distance_km,
            route.duration_minutes
        );

        Ok(GeneratedRoute {
            route,
            stage,
            candidates_considered,
        })
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaceSetting;
    use crate::services::routing::SyntheticRoutingProvider;

    fn request() -> RouteRequest {
        RouteRequest::new(
            Coordinates::new(51.5074, -0.1278).unwrap(),
            30.0,
            PaceSetting::default(),
            vec![],
        )
        .unwrap()
    }

    fn generator() -> RouteGenerator {
        RouteGenerator::new(
            RouteGeneratorConfig::default(),
            Arc::new(SyntheticRoutingProvider::new(Some(9))),
        )
    }

    #[tokio::test]
    async fn synthetic_provider_finishes_in_isochrone_stage() {
        let generator = generator();
        let provider = SyntheticRoutingProvider::new(Some(10));
        let mut rng = seeded_rng(Some(11));

        let generated = generator
            .generate(&request(), &provider, &mut rng)
            .await
            .unwrap();

        assert_eq!(generated.stage, GenerationStage::Isochrone);
        assert_eq!(generated.candidates_considered, 6);
        assert!(generated.route.distance_km > 0.0);
        assert!(generated.route.coordinates.len() >= 2);
        assert_eq!(generated.route.coordinates.first(), generated.route.coordinates.last());
    }

    #[tokio::test]
    async fn generate_loop_route_returns_route() {
        let generator = generator();
        let provider = SyntheticRoutingProvider::new(Some(12));
        let route = generator
            .generate_loop_route(&request(), &provider)
            .await
            .unwrap();
        assert_eq!(route.start_point, request().start);
    }

    #[tokio::test]
    async fn timeout_maps_to_stage_error() {
        let result: std::result::Result<(), StageError> = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            },
        )
        .await;
        assert!(matches!(result, Err(StageError::Timeout { .. })));
    }

    #[test]
    fn stage_error_messages() {
        assert_eq!(
            StageError::NoCandidates {
                stage: GenerationStage::Radius
            }
            .to_string(),
            "no candidates survived the radius stage"
        );
        let provider: StageError = AppError::RoutingApi("down".to_string()).into();
        assert_eq!(provider.to_string(), "Routing API error: down");
    }
}
