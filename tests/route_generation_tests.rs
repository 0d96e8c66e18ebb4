use loopwalk::models::GenerationStage;
use loopwalk::services::random::seeded_rng;
use loopwalk::services::route_generator::RouteGenerator;
use loopwalk::services::routing::{RoutingProvider, SyntheticRoutingProvider};
use std::sync::Arc;

mod common;

use common::{london, route_request, test_generator_config, CountingProvider, StubProvider};

fn generator_with_fallback(fallback: Arc<dyn RoutingProvider>) -> RouteGenerator {
    RouteGenerator::new(test_generator_config(), fallback)
}

#[tokio::test]
async fn test_end_to_end_isochrone_stage() {
    // 30 min at 12 min/km = 2.5 km
    let request = route_request(30.0, vec![]);
    assert_eq!(request.target_distance_km(), 2.5);

    let provider = StubProvider::fixed(2500.0, 1800.0);
    let generator = generator_with_fallback(Arc::new(SyntheticRoutingProvider::new(Some(1))));
    let mut rng = seeded_rng(Some(1));

    let generated = generator
        .generate(&request, &provider, &mut rng)
        .await
        .expect("route should be generated");

    assert_eq!(generated.stage, GenerationStage::Isochrone);
    assert!((generated.route.duration_minutes - 30.0).abs() < 0.01);
    assert!((generated.route.distance_km - 2.5).abs() < 1e-9);
    assert_eq!(generated.route.start_point, london());
    assert!(!generated.route.is_favorite);

    // Closed loop, fingerprints derived from the geometry
    let coords = &generated.route.coordinates;
    assert!(coords.len() >= 2);
    assert_eq!(coords.first(), coords.last());
    assert_eq!(generated.route.fingerprints.len(), 2);

    // One isochrone, one route per sampled waypoint, no fallback
    assert_eq!(provider.isochrone_calls(), 1);
    assert_eq!(provider.route_calls(), 6);
    assert_eq!(generated.candidates_considered, 6);
}

#[tokio::test]
async fn test_isochrone_request_uses_half_the_duration() {
    struct RecordingProvider {
        seen: std::sync::Mutex<Vec<f64>>,
    }

    #[async_trait::async_trait]
    impl RoutingProvider for RecordingProvider {
        async fn get_route(
            &self,
            _: loopwalk::models::Coordinates,
            _: loopwalk::models::Coordinates,
        ) -> loopwalk::Result<loopwalk::services::routing::RouteResponse> {
            Err(loopwalk::AppError::RoutingApi("not needed".to_string()))
        }

        async fn get_isochrone(
            &self,
            _: loopwalk::models::Coordinates,
            time_seconds: f64,
        ) -> loopwalk::Result<loopwalk::services::routing::IsochroneResponse> {
            self.seen.lock().unwrap().push(time_seconds);
            Err(loopwalk::AppError::RoutingApi("not needed".to_string()))
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    let provider = RecordingProvider {
        seen: std::sync::Mutex::new(vec![]),
    };
    let generator = generator_with_fallback(Arc::new(SyntheticRoutingProvider::new(Some(2))));
    let mut rng = seeded_rng(Some(2));

    generator
        .generate(&route_request(40.0, vec![]), &provider, &mut rng)
        .await
        .expect("synthetic fallback should succeed");

    assert_eq!(*provider.seen.lock().unwrap(), vec![1200.0]);
}

#[tokio::test]
async fn test_fallback_chain_reaches_synthetic_stage() {
    let provider = StubProvider::failing();
    let fallback = Arc::new(CountingProvider::new(SyntheticRoutingProvider::new(Some(3))));
    let generator = generator_with_fallback(fallback.clone());
    let mut rng = seeded_rng(Some(3));

    let generated = generator
        .generate(&route_request(30.0, vec![]), &provider, &mut rng)
        .await
        .expect("synthetic stage always produces a route");

    assert_eq!(generated.stage, GenerationStage::SyntheticRadius);

    // Isochrone tried once, radius stage against the real provider ran exactly once
    let waypoints = test_generator_config().radius_waypoint_count;
    assert_eq!(provider.isochrone_calls(), 1);
    assert_eq!(provider.route_calls(), waypoints);

    // Synthetic stage only ran after the radius stage failed
    assert_eq!(fallback.route_calls(), waypoints);
    assert!(generated.route.distance_km > 0.0);
    assert!(generated.route.duration_minutes > 0.0);
}

#[tokio::test]
async fn test_radius_stage_when_isochrone_unavailable() {
    let provider = StubProvider::without_isochrone(2400.0, 1750.0);
    let fallback = Arc::new(CountingProvider::new(SyntheticRoutingProvider::new(Some(4))));
    let generator = generator_with_fallback(fallback.clone());
    let mut rng = seeded_rng(Some(4));

    let generated = generator
        .generate(&route_request(30.0, vec![]), &provider, &mut rng)
        .await
        .unwrap();

    assert_eq!(generated.stage, GenerationStage::Radius);
    assert_eq!(fallback.route_calls(), 0);
    assert_eq!(generated.candidates_considered, 12);
}

#[tokio::test]
async fn test_terminal_failure_returns_none() {
    let provider = StubProvider::failing();
    let generator = generator_with_fallback(Arc::new(StubProvider::failing()));

    let route = generator
        .generate_loop_route(&route_request(30.0, vec![]), &provider)
        .await;

    assert!(route.is_none());
    assert_eq!(provider.isochrone_calls(), 1);
}

#[tokio::test]
async fn test_history_does_not_block_generation() {
    let provider = StubProvider::fixed(2500.0, 1800.0);
    let generator = generator_with_fallback(Arc::new(SyntheticRoutingProvider::new(Some(5))));
    let mut rng = seeded_rng(Some(5));

    let first = generator
        .generate(&route_request(30.0, vec![]), &provider, &mut rng)
        .await
        .unwrap();

    let history = vec![first.route.fingerprints.clone()];
    let second = generator
        .generate(&route_request(30.0, history), &provider, &mut rng)
        .await
        .unwrap();

    assert_eq!(second.stage, GenerationStage::Isochrone);
    assert_eq!(second.route.start_point, london());
}

#[tokio::test]
async fn test_concurrent_fan_out_matches_sequential_choice() {
    let provider = StubProvider::fixed(2500.0, 1800.0);

    let sequential = RouteGenerator::new(
        test_generator_config(),
        Arc::new(SyntheticRoutingProvider::new(Some(6))),
    );
    let concurrent = RouteGenerator::new(
        loopwalk::config::RouteGeneratorConfig {
            max_concurrent_requests: 4,
            ..test_generator_config()
        },
        Arc::new(SyntheticRoutingProvider::new(Some(6))),
    );

    let a = sequential
        .generate(&route_request(30.0, vec![]), &provider, &mut seeded_rng(Some(6)))
        .await
        .unwrap();
    let b = concurrent
        .generate(&route_request(30.0, vec![]), &provider, &mut seeded_rng(Some(6)))
        .await
        .unwrap();

    // All candidates tie, so the first proposal wins in both modes
    assert_eq!(a.route.coordinates, b.route.coordinates);
}
