use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report which providers and store are wired in
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.routing.name(),
        "fallback_provider": state.route_generator.fallback_provider().name(),
        "store": state.store.backend_name(),
        "stored_routes": state.store.count().await,
    }))
}
