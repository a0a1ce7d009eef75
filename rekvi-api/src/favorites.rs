use crate::error::ApiError;
use crate::session::require_user;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rekvi_favorites::ListChoice;
use rekvi_shared::MaterialId;
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/favorites/lists", get(selection_lists))
        .route("/v1/favorites", post(add_favorite))
        .route("/v1/favorites/remove", post(remove_favorite))
        .route(
            "/v1/favorites/candidates/{material_id}",
            get(removal_candidates),
        )
}

async fn selection_lists(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let user = require_user(&state).await?;
    let lists = state.favorites.selection_lists(&user).await?;
    Ok(Json(lists))
}

#[derive(Debug, Deserialize)]
struct AddFavoriteRequest {
    material_id: MaterialId,
    #[serde(flatten)]
    choice: ListChoice,
}

#[derive(Debug, Serialize)]
struct AddFavoriteResponse {
    list_name: String,
}

async fn add_favorite(
    State(state): State<AppState>,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<Json<AddFavoriteResponse>, ApiError> {
    let user = require_user(&state).await?;
    let list_name = state
        .favorites
        .add(&user, req.material_id, req.choice)
        .await?;
    Ok(Json(AddFavoriteResponse { list_name }))
}

#[derive(Debug, Deserialize)]
struct RemoveFavoriteRequest {
    material_id: MaterialId,
    list_name: String,
}

async fn remove_favorite(
    State(state): State<AppState>,
    Json(req): Json<RemoveFavoriteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = require_user(&state).await?;
    state
        .favorites
        .remove(&user, req.material_id, &req.list_name)
        .await?;
    Ok(Json(serde_json::json!({ "removed": true })))
}

/// Lists this material can be removed from, in the order the user's lists
/// are known.
async fn removal_candidates(
    State(state): State<AppState>,
    Path(material_id): Path<MaterialId>,
) -> Result<Json<Vec<String>>, ApiError> {
    let user = require_user(&state).await?;
    let material = state
        .catalog
        .get(&user, material_id)
        .await
        .map_err(|e| ApiError::remote(e, "The material could not be loaded"))?
        .ok_or_else(|| ApiError::NotFound(format!("No material with id {}", material_id)))?;
    let candidates = state
        .favorites
        .removal_candidates_for(&user, &material.favorite_memberships())
        .await?;
    Ok(Json(candidates))
}
