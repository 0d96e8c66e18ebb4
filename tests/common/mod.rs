use async_trait::async_trait;
use loopwalk::config::RouteGeneratorConfig;
use loopwalk::error::{AppError, Result};
use loopwalk::models::{Coordinates, PaceSetting, RouteRequest};
use loopwalk::services::route_generator::RouteGenerator;
use loopwalk::services::routing::{
    IsochroneResponse, RouteResponse, RoutingProvider, SyntheticRoutingProvider,
};
use loopwalk::store::{MemoryRouteStore, RouteStore};
use loopwalk::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Central London, used throughout the integration tests
#[allow(dead_code)]
pub fn london() -> Coordinates {
    Coordinates::new(51.5074, -0.1278).unwrap()
}

#[allow(dead_code)]
pub fn route_request(duration_minutes: f64, history: Vec<Vec<String>>) -> RouteRequest {
    RouteRequest::new(london(), duration_minutes, PaceSetting::default(), history).unwrap()
}

/// Deterministic generator settings for tests
#[allow(dead_code)]
pub fn test_generator_config() -> RouteGeneratorConfig {
    RouteGeneratorConfig {
        random_seed: Some(42),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

/// Routing provider with scripted answers and call counters
pub struct StubProvider {
    isochrone_fails: bool,
    route_fails: bool,
    distance_meters: f64,
    duration_seconds: f64,
    pub route_calls: AtomicUsize,
    pub isochrone_calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubProvider {
    /// Every route is a fixed-length out-and-back, isochrones are a 16-point ring
    pub fn fixed(distance_meters: f64, duration_seconds: f64) -> Self {
        StubProvider {
            isochrone_fails: false,
            route_fails: false,
            distance_meters,
            duration_seconds,
            route_calls: AtomicUsize::new(0),
            isochrone_calls: AtomicUsize::new(0),
        }
    }

    /// Isochrones fail, routes succeed
    pub fn without_isochrone(distance_meters: f64, duration_seconds: f64) -> Self {
        StubProvider {
            isochrone_fails: true,
            ..Self::fixed(distance_meters, duration_seconds)
        }
    }

    /// Everything fails
    pub fn failing() -> Self {
        StubProvider {
            isochrone_fails: true,
            route_fails: true,
            ..Self::fixed(0.0, 0.0)
        }
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }

    pub fn isochrone_calls(&self) -> usize {
        self.isochrone_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingProvider for StubProvider {
    async fn get_route(&self, start: Coordinates, waypoint: Coordinates) -> Result<RouteResponse> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        if self.route_fails {
            return Err(AppError::UpstreamStatus {
                status: 503,
                body: "routing unavailable".to_string(),
            });
        }

        // Straight out and back, 10 legs each way
        let mut geometry = Vec::with_capacity(21);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            geometry.push([
                start.lng + (waypoint.lng - start.lng) * t,
                start.lat + (waypoint.lat - start.lat) * t,
            ]);
        }
        for i in (0..10).rev() {
            geometry.push(geometry[i]);
        }

        Ok(RouteResponse {
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
            geometry,
        })
    }

    async fn get_isochrone(
        &self,
        start: Coordinates,
        time_seconds: f64,
    ) -> Result<IsochroneResponse> {
        self.isochrone_calls.fetch_add(1, Ordering::SeqCst);
        if self.isochrone_fails {
            return Err(AppError::RoutingApi("isochrone unavailable".to_string()));
        }

        let mut polygon: Vec<[f64; 2]> = (0..16)
            .map(|i| {
                let angle = i as f64 / 16.0 * std::f64::consts::TAU;
                [start.lng + 0.01 * angle.cos(), start.lat + 0.01 * angle.sin()]
            })
            .collect();
        polygon.push(polygon[0]);

        Ok(IsochroneResponse {
            polygon,
            time_seconds,
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Forwards to an inner provider while counting route calls
pub struct CountingProvider<P> {
    inner: P,
    pub route_calls: AtomicUsize,
}

#[allow(dead_code)]
impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        CountingProvider {
            inner,
            route_calls: AtomicUsize::new(0),
        }
    }

    pub fn route_calls(&self) -> usize {
        self.route_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: RoutingProvider> RoutingProvider for CountingProvider<P> {
    async fn get_route(&self, start: Coordinates, waypoint: Coordinates) -> Result<RouteResponse> {
        self.route_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_route(start, waypoint).await
    }

    async fn get_isochrone(
        &self,
        start: Coordinates,
        time_seconds: f64,
    ) -> Result<IsochroneResponse> {
        self.inner.get_isochrone(start, time_seconds).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// App state with the given primary and fallback providers and an empty store
#[allow(dead_code)]
pub fn test_state(
    routing: Arc<dyn RoutingProvider>,
    fallback: Arc<dyn RoutingProvider>,
) -> Arc<AppState> {
    let store: Arc<dyn RouteStore> = Arc::new(MemoryRouteStore::new(50));
    Arc::new(AppState {
        route_generator: RouteGenerator::new(test_generator_config(), fallback.clone()),
        routing,
        synthetic: fallback,
        store,
        history_window: loopwalk::constants::DEFAULT_HISTORY_WINDOW,
    })
}

/// App state running entirely on the synthetic provider
#[allow(dead_code)]
pub fn synthetic_state() -> Arc<AppState> {
    let synthetic: Arc<dyn RoutingProvider> = Arc::new(SyntheticRoutingProvider::new(Some(7)));
    test_state(synthetic.clone(), synthetic)
}
