use crate::error::{AppError, Result};
use crate::models::route::{LoopRouteRequest, LoopRouteResponse};
use crate::models::pace::{convert_distance, format_distance, format_time};
use crate::models::{BoundingBox, DistanceUnit, RouteRequest};
use crate::services::random::seeded_rng;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/loop
/// Generate a loop that starts and ends at the same point and takes
/// roughly the requested time at the given pace
pub async fn create_loop_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoopRouteRequest>,
) -> Result<Json<LoopRouteResponse>> {
    // Validate request
    request.validate().map_err(AppError::InvalidRequest)?;

    let provider = state.provider_for(request.provider);

    tracing::info!(
        lat = request.start_point.lat,
        lng = request.start_point.lng,
        duration_minutes = request.duration_minutes,
        pace = %request.pace,
        provider = provider.name(),
        "Loop route request: ({:.4}, {:.4}), {}min at {}, provider={}",
        request.start_point.lat, request.start_point.lng,
        request.duration_minutes, request.pace, provider.name()
    );

    let history = state.store.recent_fingerprints(state.history_window).await?;

    let route_request = RouteRequest::new(
        request.start_point,
        request.duration_minutes,
        request.pace,
        history,
    )
    .map_err(AppError::InvalidRequest)?;

    let mut rng = seeded_rng(state.route_generator.config().random_seed);
    let generated = state
        .route_generator
        .generate(&route_request, provider, &mut rng)
        .await
        .ok_or_else(|| {
            AppError::NoRouteFound(
                "No suitable route found. Try adjusting your duration or location.".to_string(),
            )
        })?;

    let unit = request.pace.unit;
    tracing::info!(
        stage = %generated.stage,
        candidates = generated.candidates_considered,
        "Loop route ready: {} in {}",
        format_distance(
            convert_distance(generated.route.distance_km, DistanceUnit::Metric, unit),
            unit
        ),
        format_time(generated.route.duration_minutes)
    );

    let bounds = BoundingBox::from_coordinates(&generated.route.coordinates);
    if let Some(center) = bounds.map(|b| b.center()) {
        tracing::debug!(lat = center.lat, lng = center.lng, "Route bounds center");
    }
    state.store.save(generated.route.clone()).await?;

    Ok(Json(LoopRouteResponse {
        route: generated.route,
        stage: generated.stage,
        bounds,
    }))
}
