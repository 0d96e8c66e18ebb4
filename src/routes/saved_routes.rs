use crate::error::{AppError, Result};
use crate::models::route::FavoriteRequest;
use crate::models::Route;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// GET /routes - history, most recent first
pub async fn list_routes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Route>>> {
    Ok(Json(state.store.list().await?))
}

/// GET /routes/favorites
pub async fn list_favorites(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Route>>> {
    Ok(Json(state.store.list_favorites().await?))
}

/// GET /routes/{id}
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Route>> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /routes/{id}
pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.store.delete(id).await? {
        tracing::info!(id = %id, "Route deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /routes/{id}/favorite - body `{"name": "..."}` is optional
pub async fn mark_favorite(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    body: Option<Json<FavoriteRequest>>,
) -> Result<Json<Route>> {
    let name = body
        .and_then(|Json(req)| req.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    state
        .store
        .set_favorite(id, name)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Route {} not found", id))
}
