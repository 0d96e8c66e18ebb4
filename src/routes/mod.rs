pub mod debug;
pub mod loop_route;
pub mod pace;
pub mod saved_routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/loop", post(loop_route::create_loop_route))
        .route("/routes", get(saved_routes::list_routes))
        .route("/routes/favorites", get(saved_routes::list_favorites))
        .route(
            "/routes/{id}",
            get(saved_routes::get_route).delete(saved_routes::delete_route),
        )
        .route("/routes/{id}/favorite", put(saved_routes::mark_favorite))
        .route("/pace/presets", get(pace::list_presets))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
